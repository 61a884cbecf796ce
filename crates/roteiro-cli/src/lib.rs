pub mod exit_codes;
pub mod seed;
