pub mod errors;
pub mod books;

#[cfg(test)]
pub mod test_support;
