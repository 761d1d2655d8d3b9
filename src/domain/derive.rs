use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use super::{error::SchemaError, schema::FieldSpec};

type DeriveFn = dyn Fn(&[&Value]) -> Value + Send + Sync;

/// Pure rule producing a field's value from other fields of the same record.
#[derive(Clone)]
pub struct Derivation {
    name: &'static str,
    dependencies: Vec<String>,
    compute: Arc<DeriveFn>,
}

impl fmt::Debug for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derivation")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

impl Derivation {
    /// Custom derivation. `compute` receives the dependency values in the
    /// order they were declared; absent dependencies arrive as `Value::Null`.
    pub fn new<I, S, F>(dependencies: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[&Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            compute: Arc::new(compute),
        }
    }

    /// Numeric sum of every dependency, e.g. gross salary from basic salary and benefits.
    pub fn sum<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut derivation = Self::new(keys, |inputs| {
            number_value(inputs.iter().map(|value| numeric(value)).sum())
        });
        derivation.name = "sum";
        derivation
    }

    /// Mirrors another field verbatim.
    pub fn copy(key: impl Into<String>) -> Self {
        let mut derivation = Self::new([key.into()], |inputs| {
            inputs.first().map(|value| (*value).clone()).unwrap_or(Value::Null)
        });
        derivation.name = "copy";
        derivation
    }

    /// `price * (1 - discount / 100)` rounded to cents; zero when the price is not positive.
    pub fn discounted_price(price: impl Into<String>, discount: impl Into<String>) -> Self {
        let mut derivation = Self::new([price.into(), discount.into()], |inputs| {
            let price = inputs.first().map(|value| numeric(value)).unwrap_or(0.0);
            let discount = inputs.get(1).map(|value| numeric(value)).unwrap_or(0.0);
            if price <= 0.0 {
                return number_value(0.0);
            }
            number_value(round_cents(price * (1.0 - discount / 100.0)))
        });
        derivation.name = "discounted_price";
        derivation
    }

    /// Stock availability label: nothing on hand, ten or fewer, or plenty.
    pub fn stock_status(stock: impl Into<String>) -> Self {
        let mut derivation = Self::new([stock.into()], |inputs| {
            let stock = inputs.first().map(|value| numeric(value)).unwrap_or(0.0);
            let label = if stock <= 0.0 {
                "Out of Stock"
            } else if stock <= 10.0 {
                "Low Stock"
            } else {
                "In Stock"
            };
            Value::String(label.to_string())
        });
        derivation.name = "stock_status";
        derivation
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn evaluate(&self, inputs: &[&Value]) -> Value {
        (self.compute)(inputs)
    }
}

/// Lenient numeric reading used by derivations and number coercion:
/// anything that is not a finite number reads as zero.
pub fn numeric(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|number| number.is_finite()).unwrap_or(0.0)
}

/// Integral results stay integers so records serialize as `1200`, not `1200.0`.
pub fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders derived fields so every derived dependency is evaluated before
/// its dependents. Fields are visited in declaration order, which keeps the
/// result stable across runs.
pub(crate) fn derivation_order<'a, I>(fields: I) -> Result<Vec<String>, SchemaError>
where
    I: IntoIterator<Item = &'a FieldSpec>,
{
    let derived: Vec<&FieldSpec> = fields
        .into_iter()
        .filter(|field| field.derivation.is_some())
        .collect();
    let by_key: HashMap<&str, &FieldSpec> = derived
        .iter()
        .map(|field| (field.key.as_str(), *field))
        .collect();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(derived.len());
    let mut stack = Vec::new();
    for field in &derived {
        visit(field, &by_key, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}

fn visit<'a>(
    field: &'a FieldSpec,
    by_key: &HashMap<&'a str, &'a FieldSpec>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
    order: &mut Vec<String>,
) -> Result<(), SchemaError> {
    match marks.get(field.key.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack
                .iter()
                .position(|key| *key == field.key)
                .unwrap_or_default();
            let mut cycle: Vec<String> = stack[start..].iter().map(|key| key.to_string()).collect();
            cycle.push(field.key.clone());
            return Err(SchemaError::CyclicDerivation { cycle });
        }
        None => {}
    }

    marks.insert(field.key.as_str(), Mark::Visiting);
    stack.push(field.key.as_str());
    if let Some(derivation) = &field.derivation {
        for dependency in derivation.dependencies() {
            if let Some(next) = by_key.get(dependency.as_str()) {
                visit(next, by_key, marks, stack, order)?;
            }
        }
    }
    stack.pop();
    marks.insert(field.key.as_str(), Mark::Done);
    order.push(field.key.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sum_treats_garbage_as_zero() {
        let derivation = Derivation::sum(["basic", "benefits"]);
        let basic = json!(1000);
        let benefits = json!("not a number");
        assert_eq!(derivation.evaluate(&[&basic, &benefits]), json!(1000));
    }

    #[test]
    fn discounted_price_rounds_to_cents() {
        let derivation = Derivation::discounted_price("tradePrice", "discount");
        let price = json!(19.99);
        let discount = json!(15);
        assert_eq!(derivation.evaluate(&[&price, &discount]), json!(16.99));
    }

    #[test]
    fn discounted_price_is_zero_without_price() {
        let derivation = Derivation::discounted_price("tradePrice", "discount");
        let price = json!(0);
        let discount = json!(50);
        assert_eq!(derivation.evaluate(&[&price, &discount]), json!(0));
    }

    #[test]
    fn stock_status_thresholds() {
        let derivation = Derivation::stock_status("stock");
        let label = |stock: Value| derivation.evaluate(&[&stock]);
        assert_eq!(label(json!(0)), json!("Out of Stock"));
        assert_eq!(label(json!(10)), json!("Low Stock"));
        assert_eq!(label(json!(11)), json!("In Stock"));
    }

    #[test]
    fn numeric_reads_strings_and_rejects_non_numbers() {
        assert_eq!(numeric(&json!(" 12.5 ")), 12.5);
        assert_eq!(numeric(&json!(null)), 0.0);
        assert_eq!(numeric(&json!([1, 2])), 0.0);
    }
}
