//! CPU evaluation of concrete expression trees.
//!
//! Evaluation mirrors the generated shader text: scalars broadcast against vectors, `MOD`
//! is the truncated remainder, and `IF` is computed as the same arithmetic blend the
//! generator writes, so a non-finite value in the untaken branch still poisons the result.
use glam::Vec3;
use mint::Vector2;

use crate::ast::Node;
use crate::codegen::Canvas;
use crate::error::{Error, Result};

/// Values bound to the free variables, each nominally in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Inputs {
    pub x: f32,
    pub y: f32,
    pub t: f32,
    pub mouse_x: f32,
    pub mouse_y: f32,
}

impl Inputs {
    /// Normalizes a fragment coordinate the way the assembled shaders do.
    ///
    /// `pixel` and `mouse` are in canvas pixels; pass pixel centers (`px + 0.5`) to match
    /// `gl_FragCoord`. `time` is in seconds.
    pub fn from_pixel(
        pixel: impl Into<Vector2<f32>>,
        canvas: Canvas,
        time: f32,
        mouse: impl Into<Vector2<f32>>,
    ) -> Self {
        let pixel = pixel.into();
        let mouse = mouse.into();
        let w = canvas.width as f32;
        let h = canvas.height as f32;
        Self {
            x: pixel.x / w * 2.0 - 1.0,
            y: pixel.y / h * 2.0 - 1.0,
            t: (time / 2.0).sin(),
            mouse_x: mouse.x / w * 2.0 - 1.0,
            mouse_y: mouse.y / h * 2.0 - 1.0,
        }
    }
}

/// Result of evaluating a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f32),
    Bool(bool),
    Vector(Vec3),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Bool(_) => "bool",
            Value::Vector(_) => "vector",
        }
    }

    fn scalar(self, op: &str) -> Result<f32> {
        match self {
            Value::Scalar(v) => Ok(v),
            other => Err(Error::Runtime(format!(
                "{op} expects a scalar, got a {}",
                other.type_name()
            ))),
        }
    }

    /// Applies `f` component-wise, broadcasting a scalar operand against a vector one.
    fn zip(self, rhs: Value, op: &str, f: impl Fn(f32, f32) -> f32) -> Result<Value> {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(a, b))),
            (Value::Scalar(a), Value::Vector(b)) => Ok(Value::Vector(Vec3::new(
                f(a, b.x),
                f(a, b.y),
                f(a, b.z),
            ))),
            (Value::Vector(a), Value::Scalar(b)) => Ok(Value::Vector(Vec3::new(
                f(a.x, b),
                f(a.y, b),
                f(a.z, b),
            ))),
            (Value::Vector(a), Value::Vector(b)) => Ok(Value::Vector(Vec3::new(
                f(a.x, b.x),
                f(a.y, b.y),
                f(a.z, b.z),
            ))),
            (a, b) => Err(Error::Runtime(format!(
                "{op} is undefined for {} and {}",
                a.type_name(),
                b.type_name()
            ))),
        }
    }
}

/// Evaluates a concrete tree at one point.
pub fn evaluate(node: &Node, inputs: &Inputs) -> Result<Value> {
    let value = match node {
        Node::X => Value::Scalar(inputs.x),
        Node::Y => Value::Scalar(inputs.y),
        Node::T => Value::Scalar(inputs.t),
        Node::MouseX => Value::Scalar(inputs.mouse_x),
        Node::MouseY => Value::Scalar(inputs.mouse_y),
        Node::Number(v) => Value::Scalar(*v),
        Node::Boolean(b) => Value::Bool(*b),
        Node::Abs(inner) => match evaluate(inner, inputs)? {
            Value::Scalar(v) => Value::Scalar(v.abs()),
            Value::Vector(v) => Value::Vector(v.abs()),
            Value::Bool(_) => return Err(Error::Runtime("ABS is undefined for bool".into())),
        },
        Node::Add(lhs, rhs) => {
            evaluate(lhs, inputs)?.zip(evaluate(rhs, inputs)?, "ADD", |a, b| a + b)?
        }
        Node::Mult(lhs, rhs) => {
            evaluate(lhs, inputs)?.zip(evaluate(rhs, inputs)?, "MULT", |a, b| a * b)?
        }
        Node::Mod(lhs, rhs) => {
            evaluate(lhs, inputs)?.zip(evaluate(rhs, inputs)?, "MOD", |a, b| a % b)?
        }
        Node::Ge(lhs, rhs) => {
            let a = evaluate(lhs, inputs)?.scalar("GE")?;
            let b = evaluate(rhs, inputs)?.scalar("GE")?;
            Value::Bool(a >= b)
        }
        Node::Triple(first, second, third) => Value::Vector(Vec3::new(
            evaluate(first, inputs)?.scalar("TRIPLE")?,
            evaluate(second, inputs)?.scalar("TRIPLE")?,
            evaluate(third, inputs)?.scalar("TRIPLE")?,
        )),
        Node::If(cond, then, elze) => {
            let taken = match evaluate(cond, inputs)? {
                Value::Bool(b) => b,
                other => {
                    return Err(Error::Runtime(format!(
                        "IF condition must be a bool, got a {}",
                        other.type_name()
                    )))
                }
            };
            let on = if taken { 1.0 } else { 0.0 };
            let then = Value::Scalar(on).zip(evaluate(then, inputs)?, "IF", |a, b| a * b)?;
            let elze =
                Value::Scalar(1.0 - on).zip(evaluate(elze, inputs)?, "IF", |a, b| a * b)?;
            then.zip(elze, "IF", |a, b| a + b)?
        }
        Node::Random | Node::Rule(_) => {
            return Err(Error::InvalidRuntimeNode { kind: node.kind() })
        }
    };
    Ok(value)
}

/// Evaluates `node` and maps the result from `[-1, 1]` to an RGB color in `[0, 1]`.
///
/// A scalar result is shown as grey.
pub fn shade(node: &Node, inputs: &Inputs) -> Result<Vec3> {
    let v = match evaluate(node, inputs)? {
        Value::Scalar(s) => Vec3::splat(s),
        Value::Vector(v) => v,
        Value::Bool(_) => return Err(Error::Runtime("cannot shade a bool".into())),
    };
    Ok(((v + Vec3::ONE) * 0.5).clamp(Vec3::ZERO, Vec3::ONE))
}
