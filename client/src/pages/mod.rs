//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! `home` composes the `login` and `signup` forms; `expenses` is the
//! authenticated ledger view.

pub mod expenses;
pub mod home;
pub mod login;
pub mod signup;
