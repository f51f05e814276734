//! Structural equality for `==`.

use sat_types::ast::Primitive;
use sat_types::scope::ScopeId;
use sat_types::Result;

use crate::evaluator::Evaluator;

impl Evaluator<'_> {
    /// Compare two values structurally.
    ///
    /// Object and Array elements are evaluated in `scope` as they are
    /// compared, left before right. Values of different kinds are never
    /// equal and neither are processes.
    pub fn equals(&mut self, left: &Primitive, right: &Primitive, scope: ScopeId) -> Result<bool> {
        match (left, right) {
            (Primitive::Void, Primitive::Void) => Ok(true),
            (Primitive::Boolean(a), Primitive::Boolean(b)) => Ok(a == b),
            (Primitive::Number(a), Primitive::Number(b)) => Ok(a == b),
            (Primitive::String(a), Primitive::String(b)) => Ok(a == b),
            (Primitive::Object(a), Primitive::Object(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (key, left) in a {
                    let Some(right) = b.get(key) else {
                        return Ok(false);
                    };
                    let left = self.evaluate(left, scope)?;
                    let right = self.evaluate(right, scope)?;
                    if !self.equals(&left, &right, scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Primitive::Array(a), Primitive::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (left, right) in a.iter().zip(b) {
                    let left = self.evaluate(left, scope)?;
                    let right = self.evaluate(right, scope)?;
                    if !self.equals(&left, &right, scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Primitive::Multi(a), Primitive::Multi(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (left, right) in a.iter().zip(b) {
                    if !self.equals(left, right, scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
