#![allow(unused_macros)]

/// Helper macro for reading locked items
///
/// Writers in this crate replace guarded state in a single assignment, so a poisoned lock still
/// holds a consistent value and readers recover it instead of failing.
///
/// ```rust, ignore
///  let data = read_lock!(self.state);
///  println!("{:?}", data.return_type);
/// ```
macro_rules! read_lock {
    ($rwlock:expr) => {
        $rwlock
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    };
}

/// Helper macro for writing to locked items, yielding `Result<guard>`
///
/// ```rust, ignore
///  let mut data = write_lock!(self.state)?;
///  *data = new_state;
/// ```
macro_rules! write_lock {
    ($rwlock:expr) => {
        $rwlock
            .write()
            .map_err(|error| crate::Error::LockError(error.to_string()))
    };
}
