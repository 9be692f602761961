pub mod bills;
pub mod navigation;
pub mod new_bill;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
