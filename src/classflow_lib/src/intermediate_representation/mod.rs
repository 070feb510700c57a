//! This module defines the intermediate representation of the analyzed programs.
//!
//! The main data structure is the [`Program`] struct,
//! which contains all classes of the program together with their methods.
//! Method bodies are lists of [`Stmt`] statements in a three-address-code style,
//! where branch targets are indices into the statement list.
//! To learn how individual statements are encoded,
//! you should first take a look at the [`Expression`] type and then at the [`Stmt`] type.
//!
//! The class hierarchy of a program is queried through the [`ClassHierarchy`] trait.

mod variable;
pub use variable::*;
mod expression;
pub use expression::*;
mod stmt;
pub use stmt::*;
mod method;
pub use method::*;
mod class;
pub use class::*;
mod program;
pub use program::*;
mod macros;
pub use macros::parsing;
