//! Expression rendering for code generation
//!
//! Expressions render to strings so statements can splice them into a line. Function expressions span several lines;
//! they are rendered at the current indentation.

use crate::backend::errors::EmitError;
use crate::frontend::ast::*;

use super::JsCodegen;

impl JsCodegen<'_> {
    pub(crate) fn render_expr(&mut self, expr: &Spanned<Expr>) -> Result<String, EmitError> {
        match &expr.node {
            Expr::Literal(literal) => render_literal(literal),
            Expr::Group(inner) => Ok(format!("({})", self.render_expr(inner)?)),
            Expr::Binary(binary) => self.render_binary(binary),
            Expr::Chain(chain) => self.render_chain(chain),
            Expr::New(new) => {
                let args = self.render_args(&new.args)?;
                Ok(format!("(new {}({}))", new.class, args))
            }
            Expr::Function(function) => self.render_function_expr(function),
        }
    }

    pub(crate) fn render_binary(&mut self, binary: &BinaryExpr) -> Result<String, EmitError> {
        let lhs = self.render_expr(&binary.lhs)?;
        let rhs = self.render_expr(&binary.rhs)?;
        Ok(format!("{} {} {}", lhs, binary.op.as_str(), rhs))
    }

    pub(crate) fn render_chain(&mut self, chain: &Chain) -> Result<String, EmitError> {
        let mut out = chain.name.clone();
        for segment in &chain.segments {
            match &segment.node {
                ChainSegment::Call(args) => {
                    let args = self.render_args(args)?;
                    out.push('(');
                    out.push_str(&args);
                    out.push(')');
                }
                ChainSegment::Property(name) => {
                    out.push('.');
                    out.push_str(name);
                }
            }
        }
        Ok(out)
    }

    fn render_args(&mut self, args: &[Spanned<Expr>]) -> Result<String, EmitError> {
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            rendered.push(self.render_expr(arg)?);
        }
        Ok(rendered.join(", "))
    }
}

/// Strings are quoted and escaped as JSON strings; other literals use their textual form.
pub(crate) fn render_literal(literal: &Literal) -> Result<String, EmitError> {
    match &literal.value {
        LiteralValue::Str(value) => Ok(serde_json::to_string(value)?),
        LiteralValue::Float(value) if value.is_nan() => Ok("NaN".to_string()),
        LiteralValue::Float(value) if value.is_infinite() => {
            Ok(if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string())
        }
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_is_escaped() {
        let literal = Literal::string("say \"hi\"\n");
        assert_eq!(render_literal(&literal).unwrap(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn test_numeric_and_boolean_literals() {
        assert_eq!(render_literal(&Literal::int(-3)).unwrap(), "-3");
        assert_eq!(render_literal(&Literal::float(2.5)).unwrap(), "2.5");
        assert_eq!(render_literal(&Literal::boolean(false)).unwrap(), "false");
    }

    #[test]
    fn test_non_finite_float_literals() {
        assert_eq!(render_literal(&Literal::float(f64::INFINITY)).unwrap(), "Infinity");
        assert_eq!(render_literal(&Literal::float(f64::NEG_INFINITY)).unwrap(), "-Infinity");
        assert_eq!(render_literal(&Literal::float(f64::NAN)).unwrap(), "NaN");
    }
}
