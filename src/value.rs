use std::{
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    ops::{Add, Mul},
    rc::Rc,
};

use crate::error::{Error, Result};

#[derive(Debug)]
struct ValuePayload {
    data: f64,
    children: Vec<Value>,
    op: String,
    label: String,
    grad: f64,
}

// Unlinks children iteratively; the default recursive drop overflows on long chains.
impl Drop for ValuePayload {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(Value(rc)) = stack.pop() {
            if let Ok(mut payload) = Rc::try_unwrap(rc) {
                stack.append(&mut payload.children);
            }
        }
    }
}

/// A node in a scalar computation graph.
///
/// A `Value` never changes after construction. Cloning it shares the same node,
/// while [`Value::with_label`] and the arithmetic operators always allocate a new one.
/// Equality and hashing follow node identity, so two leaves holding the same
/// number are still different nodes.
#[derive(Clone)]
pub struct Value(Rc<ValuePayload>);

impl Value {
    pub fn new(data: f64) -> Value {
        Self::with_children(data, vec![], "", "", 0.)
    }

    pub fn with_children(
        data: f64,
        children: Vec<Value>,
        op: impl Into<String>,
        label: impl Into<String>,
        grad: f64,
    ) -> Value {
        Self(Rc::new(ValuePayload {
            data,
            children,
            op: op.into(),
            label: label.into(),
            grad,
        }))
    }

    pub fn data(&self) -> f64 {
        self.0.data
    }

    /// Always zero; nothing computes gradients yet.
    pub fn grad(&self) -> f64 {
        self.0.grad
    }

    pub fn op(&self) -> &str {
        &self.0.op
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Operands that produced this value, in operator order.
    pub fn children(&self) -> &[Value] {
        &self.0.children
    }

    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Identity of the underlying node, stable while any clone is alive.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a new node with the same data, children, op and grad but a different label.
    pub fn with_label(&self, label: impl Into<String>) -> Value {
        Self::with_children(
            self.0.data,
            self.0.children.clone(),
            self.0.op.clone(),
            label,
            self.0.grad,
        )
    }

    /// Addition with an operand whose type is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] unless `other` is a [`Value`].
    pub fn try_add(&self, other: impl Into<Operand>) -> Result<Value> {
        let other = other.into().into_value()?;
        Ok(self + &other)
    }

    /// Multiplication with an operand whose type is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] unless `other` is a [`Value`].
    pub fn try_mul(&self, other: impl Into<Operand>) -> Result<Value> {
        let other = other.into().into_value()?;
        Ok(self * &other)
    }

    fn binary(&self, rhs: &Value, data: f64, op: &str) -> Value {
        Self::with_children(data, vec![self.clone(), rhs.clone()], op, "", 0.)
    }
}

impl Add for &Value {
    type Output = Value;
    fn add(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.0.data + rhs.0.data, "+")
    }
}

impl Add for Value {
    type Output = Value;
    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Mul for &Value {
    type Output = Value;
    fn mul(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.0.data * rhs.0.data, "*")
    }
}

impl Mul for Value {
    type Output = Value;
    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<f64> for Value {
    fn from(data: f64) -> Self {
        Self::new(data)
    }
}

impl From<f32> for Value {
    fn from(data: f32) -> Self {
        Self::new(data.into())
    }
}

impl From<i32> for Value {
    fn from(data: i32) -> Self {
        Self::new(data.into())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value(data={}, label={})", repr_float(self.0.data), self.0.label)
    }
}

/// Shortest round-trip float text in the conventional `repr` spelling:
/// `2.0`, `nan`, `-inf`, `1e+20`, `1e-05`.
fn repr_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0. { "inf" } else { "-inf" }.to_string();
    }
    let text = format!("{x:?}");
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

// Children are listed by id so that deep graphs don't print recursively.
impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("id", &self.id())
            .field("data", &self.0.data)
            .field("op", &self.0.op)
            .field("label", &self.0.label)
            .field("grad", &self.0.grad)
            .field(
                "children",
                &self.0.children.iter().map(Value::id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Right-hand side of [`Value::try_add`] and [`Value::try_mul`].
#[derive(Clone, Debug)]
pub enum Operand {
    Value(Value),
    Scalar(f64),
}

impl Operand {
    fn into_value(self) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Scalar(_) => Err(Error::InvalidOperand { found: "f64" }),
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        Self::Value(value.clone())
    }
}

impl From<f64> for Operand {
    fn from(scalar: f64) -> Self {
        Self::Scalar(scalar)
    }
}
