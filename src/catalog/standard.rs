use super::{Catalog, NodeType, NodeTypeBuilder};
use crate::error::CatalogError;
use crate::value::{Value, ValueType};

// Beyond this many digits an f64 has nothing left to round.
const MAX_ROUND_DIGITS: i32 = 15;

/// Defines the numeric binary node types: two required number inputs, one number output.
macro_rules! define_binary_nodes {
    ( $( ($node_type:expr, $description:expr, $output:expr, |$a:ident, $b:ident| $body:expr) ),* $(,)? ) => {
        fn binary_node_types() -> Vec<NodeTypeBuilder> {
            vec![
                $(
                    NodeType::builder($node_type)
                        .description($description)
                        .param("a", ValueType::Number)
                        .param("b", ValueType::Number)
                        .output($output)
                        .implementation(|args| {
                            let $a = args.number("a")?;
                            let $b = args.number("b")?;
                            Ok(Value::from($body))
                        }),
                )*
            ]
        }
    };
}

define_binary_nodes! {
    ("add", "Add two numbers", ValueType::Number, |a, b| a + b),
    ("subtract", "Find difference between two numbers", ValueType::Number, |a, b| a - b),
    ("multiply", "Multiply two numbers", ValueType::Number, |a, b| a * b),
    // Division by zero yields 0 rather than an error.
    ("divide", "Divide a by b; dividing by zero yields 0", ValueType::Number, |a, b| if b == 0.0 { 0.0 } else { a / b }),
    ("greater_than", "Whether a is greater than b", ValueType::Bool, |a, b| a > b),
    ("less_than", "Whether a is smaller than b", ValueType::Bool, |a, b| a < b),
}

fn other_node_types() -> Vec<NodeTypeBuilder> {
    vec![
        NodeType::builder("constant")
            .description("Pass a literal value through")
            .param("value", ValueType::Any)
            .output(ValueType::Any)
            .implementation(|args| Ok(args.get("value")?.clone())),
        NodeType::builder("power")
            .description("Raise base to an exponent (squares by default)")
            .param("base", ValueType::Number)
            .param_with_default("exp", ValueType::Number, 2.0)
            .output(ValueType::Number)
            .implementation(|args| Ok(Value::from(args.number("base")?.powf(args.number("exp")?)))),
        NodeType::builder("negate")
            .description("Flip the sign of a number")
            .param("value", ValueType::Number)
            .output(ValueType::Number)
            .implementation(|args| Ok(Value::from(-args.number("value")?))),
        NodeType::builder("abs")
            .description("Absolute value of a number")
            .param("value", ValueType::Number)
            .output(ValueType::Number)
            .implementation(|args| Ok(Value::from(args.number("value")?.abs()))),
        NodeType::builder("round")
            .description("Round a number to the given count of decimal digits")
            .param("value", ValueType::Number)
            .param_with_default("digits", ValueType::Integer, 0i64)
            .output(ValueType::Number)
            .implementation(|args| {
                let digits = args.integer("digits")?;
                let digits = i32::try_from(digits)
                    .map_err(|_| format!("digits {} is out of range", digits))?;
                let factor = 10f64.powi(digits.clamp(-MAX_ROUND_DIGITS, MAX_ROUND_DIGITS));
                Ok(Value::from((args.number("value")? * factor).round() / factor))
            }),
        NodeType::builder("equal")
            .description("Whether two values are equal")
            .param("a", ValueType::Any)
            .param("b", ValueType::Any)
            .output(ValueType::Bool)
            .implementation(|args| Ok(Value::from(args.get("a")? == args.get("b")?))),
        NodeType::builder("and")
            .description("Logical AND")
            .param("a", ValueType::Bool)
            .param("b", ValueType::Bool)
            .output(ValueType::Bool)
            .implementation(|args| Ok(Value::from(args.boolean("a")? && args.boolean("b")?))),
        NodeType::builder("or")
            .description("Logical OR")
            .param("a", ValueType::Bool)
            .param("b", ValueType::Bool)
            .output(ValueType::Bool)
            .implementation(|args| Ok(Value::from(args.boolean("a")? || args.boolean("b")?))),
        NodeType::builder("not")
            .description("Logical NOT")
            .param("value", ValueType::Bool)
            .output(ValueType::Bool)
            .implementation(|args| Ok(Value::from(!args.boolean("value")?))),
        NodeType::builder("if")
            .description("Choose between two values")
            .param("cond", ValueType::Bool)
            .param("then", ValueType::Any)
            .param("else", ValueType::Any)
            .output(ValueType::Any)
            .implementation(|args| {
                let branch = if args.boolean("cond")? { "then" } else { "else" };
                Ok(args.get(branch)?.clone())
            }),
        NodeType::builder("concat")
            .description("Join two pieces of text")
            .param("a", ValueType::Text)
            .param("b", ValueType::Text)
            .param_with_default("separator", ValueType::Text, "")
            .output(ValueType::Text)
            .implementation(|args| {
                Ok(Value::from(format!(
                    "{}{}{}",
                    args.text("a")?,
                    args.text("separator")?,
                    args.text("b")?
                )))
            }),
        NodeType::builder("to_text")
            .description("Render any value as text")
            .param("value", ValueType::Any)
            .output(ValueType::Text)
            .implementation(|args| Ok(Value::from(args.get("value")?.to_string()))),
        NodeType::builder("length")
            .description("Number of items in a list")
            .param("list", ValueType::List)
            .output(ValueType::Integer)
            .implementation(|args| Ok(Value::from(args.list("list")?.len() as i64))),
        NodeType::builder("sum")
            .description("Sum of a list of numbers")
            .param("list", ValueType::List)
            .output(ValueType::Number)
            .implementation(|args| {
                let mut total = 0.0;
                for item in args.list("list")? {
                    total += item.coerce(ValueType::Number)?.as_f64().unwrap_or(0.0);
                }
                Ok(Value::from(total))
            }),
    ]
}

pub(super) fn register_standard_types(catalog: &mut Catalog) -> Result<(), CatalogError> {
    for builder in binary_node_types().into_iter().chain(other_node_types()) {
        catalog.register(builder.build()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Args;

    fn call(catalog: &Catalog, name: &str, args: Args) -> Value {
        catalog.lookup(name).unwrap().call(&args).unwrap()
    }

    #[test]
    fn standard_catalog_registers_every_type() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 20);
        assert!(catalog.contains("add"));
        assert!(catalog.contains("sum"));
    }

    #[test]
    fn divide_by_zero_yields_zero() {
        let catalog = Catalog::standard();
        let v = call(&catalog, "divide", Args::new().with("a", 4.0).with("b", 0.0));
        assert_eq!(v, Value::Number(0.0));
    }

    #[test]
    fn round_uses_digits() {
        let catalog = Catalog::standard();
        let v = call(
            &catalog,
            "round",
            Args::new().with("value", 1.23456).with("digits", 2i64),
        );
        assert_eq!(v, Value::Number(1.23));
    }

    #[test]
    fn round_rejects_digits_outside_i32() {
        let catalog = Catalog::standard();
        let node_type = catalog.lookup("round").unwrap();
        let args = Args::new().with("value", 2.5).with("digits", 4_294_967_298i64);
        let err = node_type.call(&args).unwrap_err();
        assert_eq!(err.to_string(), "digits 4294967298 is out of range");
    }

    #[test]
    fn round_clamps_large_digit_counts() {
        let catalog = Catalog::standard();
        let v = call(&catalog, "round", Args::new().with("value", 2.5).with("digits", 400i64));
        assert_eq!(v, Value::Number(2.5));
        let v = call(&catalog, "round", Args::new().with("value", 1234.0).with("digits", -400i64));
        assert_eq!(v, Value::Number(0.0));
    }

    #[test]
    fn registering_twice_reports_the_duplicate() {
        let mut catalog = Catalog::standard();
        assert_eq!(
            register_standard_types(&mut catalog),
            Err(CatalogError::DuplicateType("add".to_string()))
        );
    }

    #[test]
    fn sum_fails_on_non_numeric_item() {
        let catalog = Catalog::standard();
        let node_type = catalog.lookup("sum").unwrap();
        let args = Args::new().with("list", vec![Value::from(1.0), Value::from("x")]);
        assert!(node_type.call(&args).is_err());
    }
}
