pub mod constants;
pub mod notification;
pub mod rows;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
