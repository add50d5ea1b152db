mod determinism;
mod process_logic;
mod realism;
mod scenarios;
