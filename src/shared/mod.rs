pub mod audit;
pub mod constants;
pub mod pageable;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod validation;
