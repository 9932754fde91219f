mod common;
mod test_damage;
mod test_end_of_turn;
mod test_multi_turn;
mod test_turn_engine;
