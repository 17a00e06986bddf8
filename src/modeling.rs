//! The DEVS modeling layer: the generic [`Component`] every model owns, the
//! [`Atomic`] trait leaf models implement, the [`Coupled`] composite, and
//! the type-erased [`port`] machinery that lets differently-typed ports
//! live in the same coupling tables.

pub mod atomic;
pub mod component;
pub mod coupled;
pub mod port;

pub use atomic::Atomic;
pub use component::Component;
pub use coupled::Coupled;
pub use port::{Input, Output, Port};
