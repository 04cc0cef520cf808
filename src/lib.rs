mod dot;
mod error;
mod trace;
mod value;

pub use dot::{draw_dot, Digraph, Format, Statement};
pub use error::{Error, Result};
pub use trace::{trace, Trace};
pub use value::{Operand, Value};
