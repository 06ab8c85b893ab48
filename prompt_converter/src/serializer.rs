//! Conversion of tags back into prompt text.

use crate::profile::BracketStyle;
use crate::tag::ClassifiedTag;
use crate::weight::{DEEMPHASIS_BASE, EMPHASIS_BASE};

/// Weights closer to 1.0 than this are not written.
pub const WEIGHT_EPSILON: f64 = 0.001;

/// Escapes `(` and `)` with a backslash.
pub fn escape_parentheses(name: &str) -> String {
    name.replace('(', "\\(").replace(')', "\\)")
}

/// Formats a weight in its shortest round-trip form.
///
/// Integral values keep one decimal digit (`2.0`, not `2`). Magnitudes below 1e-4 or
/// from 1e16 up use exponent notation with a signed two-digit exponent (`1e-05`,
/// `1.5e+20`), and non-finite values are written as `nan`, `inf` and `-inf`.
fn format_weight(weight: f64) -> String {
    if weight.is_nan() {
        return "nan".to_string();
    }
    if weight.is_infinite() {
        return if weight > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if weight != 0.0 {
        let sci = format!("{weight:e}");
        if let Some((mantissa, exp)) = sci.split_once('e') {
            if let Ok(exp) = exp.parse::<i32>() {
                if !(-4..16).contains(&exp) {
                    let sign = if exp < 0 { '-' } else { '+' };
                    return format!("{mantissa}e{sign}{:02}", exp.abs());
                }
            }
        }
    }
    if weight.fract() == 0.0 {
        format!("{weight:.1}")
    } else {
        weight.to_string()
    }
}

/// Gets the number of `{}` or `[]` layers closest to `weight`, or `None` when the
/// weight cannot be written as nested brackets.
pub fn nest_depth(weight: f64) -> Option<usize> {
    if !weight.is_finite() || weight <= 0.0 {
        return None;
    }
    let base = if weight > 1.0 {
        EMPHASIS_BASE
    } else {
        DEEMPHASIS_BASE
    };
    Some((weight.ln() / base.ln()).abs().round_ties_even() as usize)
}

/// Writes a single tag.
///
/// # Arguments
///
/// * `name` - Tag name, already escaped and normalized.
/// * `weight` - Emphasis weight.
/// * `style` - Bracket style.
///
/// # Returns
///
/// The tag text.
///
/// # Examples
///
/// ```
/// use prompt_converter::{serialize_tag, BracketStyle};
///
/// assert_eq!("(smile:1.2)", serialize_tag("smile", 1.2, BracketStyle::ExplicitWeight));
/// assert_eq!("{{smile}}", serialize_tag("smile", 1.1025, BracketStyle::NestedEmphasis));
/// assert_eq!("smile", serialize_tag("smile", 1.0005, BracketStyle::NestedEmphasis));
/// ```
pub fn serialize_tag(name: &str, weight: f64, style: BracketStyle) -> String {
    if (weight - 1.0).abs() < WEIGHT_EPSILON {
        return name.to_string();
    }
    match style {
        BracketStyle::ExplicitWeight => format!("({name}:{})", format_weight(weight)),
        BracketStyle::NestedEmphasis => {
            let Some(depth) = nest_depth(weight) else {
                tracing::debug!(name, weight, "weight has no bracket form; writing bare name");
                return name.to_string();
            };
            let (open, close) = if weight > 1.0 { ("{", "}") } else { ("[", "]") };
            format!("{}{name}{}", open.repeat(depth), close.repeat(depth))
        }
    }
}

/// Writes tags as a prompt.
///
/// Parentheses are escaped first when `escape` is set, then underscores become
/// spaces, and the serialized tags are joined with `", "`.
///
/// # Arguments
///
/// * `tags` - Ordered tags.
/// * `style` - Bracket style.
/// * `escape` - Whether `(` and `)` in names are escaped.
///
/// # Returns
///
/// The prompt.
pub fn serialize_tags(tags: &[ClassifiedTag], style: BracketStyle, escape: bool) -> String {
    tags.iter()
        .map(|tag| {
            let name = if escape {
                escape_parentheses(&tag.name)
            } else {
                tag.name.clone()
            };
            serialize_tag(&name.replace('_', " "), tag.weight, style)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tag::Category;
    use crate::weight::parse_weight;

    #[test]
    fn test_bare_near_one() {
        for style in [BracketStyle::ExplicitWeight, BracketStyle::NestedEmphasis] {
            assert_eq!("a", serialize_tag("a", 1.0, style));
            assert_eq!("a", serialize_tag("a", 0.9995, style));
            assert_eq!("a", serialize_tag("a", 1.0009, style));
        }
    }

    #[test]
    fn test_explicit_weight_format() {
        assert_eq!("(a:1.7)", serialize_tag("a", 1.7, BracketStyle::ExplicitWeight));
        assert_eq!("(a:2.0)", serialize_tag("a", 2.0, BracketStyle::ExplicitWeight));
        assert_eq!("(a:0.0)", serialize_tag("a", 0.0, BracketStyle::ExplicitWeight));
        assert_eq!("(a:-1.5)", serialize_tag("a", -1.5, BracketStyle::ExplicitWeight));
    }

    #[test]
    fn test_explicit_weight_exponent_format() {
        assert_eq!("0.0001", format_weight(1e-4));
        assert_eq!("1e-05", format_weight(1e-5));
        assert_eq!("-2.5e-07", format_weight(-2.5e-7));
        assert_eq!("1000000000000000.0", format_weight(1e15));
        assert_eq!("1e+16", format_weight(1e16));
        assert_eq!("1.5e+20", format_weight(1.5e20));
        assert_eq!("nan", format_weight(f64::NAN));
        assert_eq!("-inf", format_weight(f64::NEG_INFINITY));
        assert_eq!("(a:nan)", serialize_tag("a", f64::NAN, BracketStyle::ExplicitWeight));
    }

    #[test]
    fn test_nested_roundtrip() {
        for k in 1..=8 {
            let up = format!("{}x{}", "{".repeat(k), "}".repeat(k));
            let tag = parse_weight(&up);
            assert_eq!(up, serialize_tag(&tag.name, tag.weight, BracketStyle::NestedEmphasis));

            let down = format!("{}x{}", "[".repeat(k), "]".repeat(k));
            let tag = parse_weight(&down);
            assert_eq!(down, serialize_tag(&tag.name, tag.weight, BracketStyle::NestedEmphasis));
        }
    }

    #[test]
    fn test_nested_lossy() {
        // log(1.7, 1.05) = 10.88
        assert_eq!(Some(11), nest_depth(1.7));
        assert_eq!(
            format!("{}loli{}", "{".repeat(11), "}".repeat(11)),
            serialize_tag("loli", 1.7, BracketStyle::NestedEmphasis)
        );
        assert_eq!("[a]", serialize_tag("a", 0.96, BracketStyle::NestedEmphasis));
    }

    #[test]
    fn test_nested_non_positive() {
        assert_eq!(None, nest_depth(0.0));
        assert_eq!(None, nest_depth(-2.0));
        assert_eq!("a", serialize_tag("a", -2.0, BracketStyle::NestedEmphasis));
    }

    #[test]
    fn test_serialize_tags_escape_and_spaces() {
        let mut tag = ClassifiedTag::new("foo_(series)", Category::Character);
        tag.weight = 1.2;
        let tags = vec![ClassifiedTag::new("long_hair", Category::General), tag];
        assert_eq!(
            "long hair, (foo \\(series\\):1.2)",
            serialize_tags(&tags, BracketStyle::ExplicitWeight, true)
        );
        assert_eq!(
            "long hair, {{{{foo (series)}}}}",
            serialize_tags(&tags, BracketStyle::NestedEmphasis, false)
        );
    }
}
