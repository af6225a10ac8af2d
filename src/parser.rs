//! Load-to-stress transfer expressions evaluated per sample.
use anyhow::{anyhow, Context, Result};
use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Node, Value};
use std::collections::HashMap;

/// Name the raw sample is bound to inside a transfer expression.
pub const SAMPLE_VARIABLE: &str = "x";

/// A compiled load-to-stress transfer, e.g. `k * x^2` for a wind-speed record.
#[derive(Debug, Clone)]
pub struct Transfer {
    expression: String,
    node: Node,
    context: HashMapContext,
}

impl Transfer {
    /// Compiles `expression` with the given named constants in scope.
    pub fn new(expression: &str, parameters: &HashMap<String, f64>) -> Result<Self> {
        let node = build_operator_tree(expression)
            .with_context(|| format!("failed to parse transfer expression '{}'", expression))?;

        let mut context = HashMapContext::new();
        for (key, value) in parameters {
            context
                .set_value(key.clone(), Value::Float(*value))
                .map_err(|e| anyhow!("failed to insert parameter '{}' into context: {}", key, e))?;
        }

        Ok(Transfer {
            expression: expression.to_owned(),
            node,
            context,
        })
    }

    /// Evaluates the expression once per sample.
    pub fn apply(&self, samples: &[f64]) -> Result<Vec<f64>> {
        let mut context = self.context.clone();
        samples
            .iter()
            .enumerate()
            .map(|(index, &sample)| {
                context
                    .set_value(SAMPLE_VARIABLE.into(), Value::Float(sample))
                    .map_err(|e| anyhow!("failed to bind sample {}: {}", index, e))?;
                self.node
                    .eval_number_with_context(&context)
                    .map_err(|e| anyhow!("failed to evaluate '{}' at sample {}: {}", self.expression, index, e))
            })
            .collect()
    }
}

/// Applies an optional transfer; no expression means the samples are stresses already.
pub fn to_stress(
    samples: Vec<f64>,
    expression: Option<&str>,
    parameters: &HashMap<String, f64>,
) -> Result<Vec<f64>> {
    match expression {
        Some(expression) => Transfer::new(expression, parameters)?.apply(&samples),
        None => Ok(samples),
    }
}
