//! printf-style template rendering
//!
//! Supported verbs: `%v %s %d %i %f %F %e %E %g %G %x %X %o %b %q %t %c`
//! and `%%`. Flags `-`, `+`, `0`, space and `#`, a decimal width and a
//! `.precision` may precede the verb.
//!
//! Problems never fail the call. They are rendered inline instead:
//! `%!d(MISSING)` for an absent argument, `%!d(string=abc)` for a verb that
//! does not fit its argument, `%!(NOVERB)` for a trailing `%`,
//! `%!(BADWIDTH)` or `%!(BADPREC)` for a width or precision above one
//! million, and `%!(EXTRA int=1, string=x)` for leftover arguments.
//!
//! `%s` takes strings and chars only. `%g` without a precision switches to
//! exponent form at `1e+06`, while `%v` keeps plain digits up to `1e+21`.

use super::message::Arg;

const MAX_WIDTH_OR_PREC: usize = 1_000_000;

/// An f64 has no nonzero decimal digit past this many places
const MAX_FLOAT_DIGITS: usize = 1100;

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    zero: bool,
    space: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Rendered conversion before padding
struct Piece {
    sign: &'static str,
    prefix: &'static str,
    body: String,
    numeric: bool,
}

impl Piece {
    fn text(body: String) -> Self {
        Self {
            sign: "",
            prefix: "",
            body,
            numeric: false,
        }
    }

    fn number(negative: bool, spec: &Spec, prefix: &'static str, body: String) -> Self {
        let sign = if negative {
            "-"
        } else if spec.plus {
            "+"
        } else if spec.space {
            " "
        } else {
            ""
        };
        Self {
            sign,
            prefix,
            body,
            numeric: true,
        }
    }

    fn pad(self, spec: &Spec, out: &mut String) {
        let len = self.sign.len() + self.prefix.len() + self.body.chars().count();
        let fill = spec.width.map_or(0, |w| w.saturating_sub(len));

        if spec.minus {
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.push_str(&self.body);
            out.extend(std::iter::repeat(' ').take(fill));
        } else if spec.zero && self.numeric {
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.extend(std::iter::repeat('0').take(fill));
            out.push_str(&self.body);
        } else {
            out.extend(std::iter::repeat(' ').take(fill));
            out.push_str(self.sign);
            out.push_str(self.prefix);
            out.push_str(&self.body);
        }
    }
}

/// Substitute `args` into `template`
pub fn render(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                '#' => spec.sharp = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = read_number(&mut chars);
        if spec.width.is_some_and(|w| w > MAX_WIDTH_OR_PREC) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = read_number(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH_OR_PREC {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                match convert(verb, arg, &spec) {
                    Some(piece) => piece.pad(&spec, &mut out),
                    None => bad_verb(verb, arg, &mut out),
                }
            }
            None => {
                out.push_str("%!");
                out.push(verb);
                out.push_str("(MISSING)");
            }
        }
    }

    if next_arg < args.len() {
        let extra = args[next_arg..]
            .iter()
            .map(|arg| format!("{}={}", arg.type_name(), arg))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("%!(EXTRA ");
        out.push_str(&extra);
        out.push(')');
    }

    out
}

fn read_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

fn bad_verb(verb: char, arg: &Arg, out: &mut String) {
    out.push_str("%!");
    out.push(verb);
    out.push('(');
    out.push_str(arg.type_name());
    out.push('=');
    out.push_str(&arg.to_string());
    out.push(')');
}

fn convert(verb: char, arg: &Arg, spec: &Spec) -> Option<Piece> {
    match verb {
        'v' => Some(match arg {
            Arg::Int(i) => Piece::number(*i < 0, spec, "", i.unsigned_abs().to_string()),
            Arg::UInt(u) => Piece::number(false, spec, "", u.to_string()),
            Arg::Float(f) => float_piece(*f, spec, 'v'),
            other => truncated(other.to_string(), spec),
        }),
        's' => match arg {
            Arg::Str(_) | Arg::Char(_) => Some(truncated(arg.to_string(), spec)),
            _ => None,
        },
        'd' | 'i' => integer_piece(arg, spec, 10, false),
        'x' | 'X' => match arg {
            Arg::Str(s) => {
                let hex: String = s.bytes().map(|b| format!("{:02x}", b)).collect();
                Some(Piece::text(if verb == 'X' { hex.to_uppercase() } else { hex }))
            }
            _ => integer_piece(arg, spec, 16, verb == 'X'),
        },
        'o' => integer_piece(arg, spec, 8, false),
        'b' => integer_piece(arg, spec, 2, false),
        'c' => match arg {
            Arg::Char(c) => Some(Piece::text(c.to_string())),
            Arg::Int(i) => u32::try_from(*i)
                .ok()
                .and_then(char::from_u32)
                .map(|c| Piece::text(c.to_string())),
            Arg::UInt(u) => u32::try_from(*u)
                .ok()
                .and_then(char::from_u32)
                .map(|c| Piece::text(c.to_string())),
            _ => None,
        },
        'q' => match arg {
            Arg::Str(s) => Some(Piece::text(format!("{:?}", s))),
            Arg::Char(c) => Some(Piece::text(format!("{:?}", c))),
            _ => None,
        },
        't' => match arg {
            Arg::Bool(b) => Some(Piece::text(b.to_string())),
            _ => None,
        },
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let value = match arg {
                Arg::Float(f) => *f,
                Arg::Int(i) => *i as f64,
                Arg::UInt(u) => *u as f64,
                _ => return None,
            };
            Some(float_piece(value, spec, verb))
        }
        _ => None,
    }
}

fn truncated(text: String, spec: &Spec) -> Piece {
    Piece::text(match spec.precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    })
}

fn integer_piece(arg: &Arg, spec: &Spec, radix: u32, upper: bool) -> Option<Piece> {
    let (negative, magnitude) = match arg {
        Arg::Int(i) => (*i < 0, i.unsigned_abs()),
        Arg::UInt(u) => (false, *u),
        Arg::Char(c) if radix == 10 => (false, *c as u64),
        _ => return None,
    };

    let mut digits = match radix {
        2 => format!("{:b}", magnitude),
        8 => format!("{:o}", magnitude),
        16 if upper => format!("{:X}", magnitude),
        16 => format!("{:x}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(p) = spec.precision {
        if digits.len() < p {
            digits = format!("{}{}", "0".repeat(p - digits.len()), digits);
        }
    }

    let prefix = match (spec.sharp, radix, upper) {
        (true, 16, true) => "0X",
        (true, 16, false) => "0x",
        (true, 8, _) => "0",
        (true, 2, _) => "0b",
        _ => "",
    };

    Some(Piece::number(negative, spec, prefix, digits))
}

fn float_piece(value: f64, spec: &Spec, verb: char) -> Piece {
    if value.is_nan() {
        return Piece::text("NaN".to_string());
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "+" };
        return Piece::text(format!("{}Inf", sign));
    }

    let negative = value.is_sign_negative() && value != 0.0;
    let magnitude = value.abs();
    let body = match verb {
        'f' | 'F' => fixed_form(magnitude, spec.precision.unwrap_or(6)),
        'e' => exponent_form(magnitude, spec.precision.unwrap_or(6)),
        'E' => exponent_form(magnitude, spec.precision.unwrap_or(6)).to_uppercase(),
        'G' => general_form(magnitude, spec.precision, 6).to_uppercase(),
        'v' => general_form(magnitude, spec.precision, 21),
        _ => general_form(magnitude, spec.precision, 6),
    };

    Piece::number(negative, spec, "", body)
}

fn zeros(count: usize) -> String {
    "0".repeat(count)
}

fn fixed_form(value: f64, precision: usize) -> String {
    let shown = precision.min(MAX_FLOAT_DIGITS);
    format!("{:.*}{}", shown, value, zeros(precision - shown))
}

/// `1.500000e+03` style, two digit exponent minimum
fn exponent_form(value: f64, precision: usize) -> String {
    let shown = precision.min(MAX_FLOAT_DIGITS);
    let raw = format!("{:.*e}", shown, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => fix_exponent(&format!("{}{}e{}", mantissa, zeros(precision - shown), exp)),
        None => raw,
    }
}

fn fix_exponent(raw: &str) -> String {
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw.to_string(),
    }
}

/// `exponent_at` is the power of ten where shortest output turns to exponent form
fn general_form(value: f64, precision: Option<usize>, exponent_at: i32) -> String {
    match precision {
        None => {
            if value == 0.0 || (1e-4..10f64.powi(exponent_at)).contains(&value) {
                value.to_string()
            } else {
                fix_exponent(&format!("{:e}", value))
            }
        }
        Some(p) => {
            let p = p.clamp(1, MAX_FLOAT_DIGITS);
            if value == 0.0 {
                return "0".to_string();
            }
            let exp = value.log10().floor() as i32;
            if exp < -4 || exp >= p as i32 {
                let raw = format!("{:.*e}", p - 1, value);
                let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
                fix_exponent(&format!("{}e{}", trim_zeros(mantissa), exp))
            } else {
                let decimals = (p as i32 - 1 - exp).max(0) as usize;
                trim_zeros(&format!("{:.*}", decimals, value)).to_string()
            }
        }
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Default text for a float, as `%v` prints it
pub fn float_default(value: f64) -> String {
    let piece = float_piece(value, &Spec::default(), 'v');
    format!("{}{}", piece.sign, piece.body)
}
