//! TeX-like formula source to single-line Unicode.
//!
//! Covers the subset the scenes use: groups, `^`/`_` scripts, `\frac`,
//! `\sqrt`, `\text`, `\vec`, spacing commands and a handful of symbols.
//! Anything unknown is passed through without its backslash.

/// Render formula source to a single line of Unicode text.
pub fn to_unicode(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0;
    render_until(&chars, &mut pos, false).trim().to_string()
}

fn render_until(chars: &[char], pos: &mut usize, in_group: bool) -> String {
    let mut out = String::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        match c {
            '}' if in_group => {
                *pos += 1;
                return out;
            }
            '{' => {
                *pos += 1;
                out.push_str(&render_until(chars, pos, true));
            }
            '\\' => {
                let cmd = command(chars, pos);
                // A centred dot hugs its operands.
                if cmd == "·" {
                    out.truncate(out.trim_end().len());
                    while chars.get(*pos) == Some(&' ') {
                        *pos += 1;
                    }
                }
                out.push_str(&cmd);
            }
            '^' => {
                *pos += 1;
                let arg = read_arg(chars, pos);
                out.push_str(&script(&arg, superscript, '^'));
            }
            '_' => {
                *pos += 1;
                let arg = read_arg(chars, pos);
                out.push_str(&script(&arg, subscript, '_'));
            }
            '&' => *pos += 1,
            '~' => {
                *pos += 1;
                out.push(' ');
            }
            _ => {
                *pos += 1;
                out.push(c);
            }
        }
    }
    out
}

/// One argument: a braced group, a command, or a single character.
fn read_arg(chars: &[char], pos: &mut usize) -> String {
    while *pos < chars.len() && chars[*pos] == ' ' {
        *pos += 1;
    }
    match chars.get(*pos) {
        Some('{') => {
            *pos += 1;
            render_until(chars, pos, true)
        }
        Some('\\') => command(chars, pos),
        Some(&c) => {
            *pos += 1;
            c.to_string()
        }
        None => String::new(),
    }
}

fn command(chars: &[char], pos: &mut usize) -> String {
    // Skip the backslash.
    *pos += 1;
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_alphabetic() {
        *pos += 1;
    }
    if *pos == start {
        // Control symbol: \| \, \; \{ \\ ...
        let Some(&sym) = chars.get(*pos) else {
            return String::new();
        };
        *pos += 1;
        return match sym {
            '|' => "‖".to_string(),
            ',' | ';' | ':' | ' ' | '\\' => " ".to_string(),
            '!' => String::new(),
            other => other.to_string(),
        };
    }
    let name: String = chars[start..*pos].iter().collect();
    let out = match name.as_str() {
        "text" | "mathrm" | "textbf" | "mathbf" | "operatorname" => return read_arg(chars, pos),
        "sqrt" => return format!("√{}", wrap(&read_arg(chars, pos))),
        "frac" => {
            let num = read_arg(chars, pos);
            let den = read_arg(chars, pos);
            return format!("{}/{}", wrap(&num), wrap(&den));
        }
        "vec" => return read_arg(chars, pos).chars().map(bold).collect(),
        "left" | "right" | "displaystyle" | "limits" | "small" | "large" => String::new(),
        "quad" => "  ".to_string(),
        "qquad" => "    ".to_string(),
        other => symbol(other).map_or_else(|| other.to_string(), str::to_string),
    };
    // A control word ends at the first space, which it swallows. Operators
    // keep it so `a \approx b` stays spaced.
    if out.chars().last().is_none_or(|c| c.is_whitespace() || c.is_alphabetic()) {
        while chars.get(*pos) == Some(&' ') {
            *pos += 1;
        }
    }
    out
}

fn symbol(name: &str) -> Option<&'static str> {
    let s = match name {
        "theta" => "θ",
        "alpha" => "α",
        "beta" => "β",
        "pi" => "π",
        "Delta" => "Δ",
        "sum" => "Σ",
        "cdot" => "·",
        "times" => "×",
        "approx" => "≈",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "neq" | "ne" => "≠",
        "pm" => "±",
        "infty" => "∞",
        "circ" => "°",
        "in" => "∈",
        "to" | "rightarrow" => "→",
        "cos" => "cos",
        "sin" => "sin",
        "max" => "max",
        "min" => "min",
        _ => return None,
    };
    Some(s)
}

/// Parenthesise anything longer than a single symbol.
fn wrap(s: &str) -> String {
    let s = s.trim();
    if s.chars().count() <= 1 || (s.starts_with('(') && s.ends_with(')') && balanced_outer(s)) {
        s.to_string()
    } else {
        format!("({s})")
    }
}

/// True when the first '(' closes at the very last character.
fn balanced_outer(s: &str) -> bool {
    let mut depth = 0i32;
    let n = s.chars().count();
    for (i, c) in s.chars().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i + 1 < n {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn script(arg: &str, map: fn(char) -> Option<char>, marker: char) -> String {
    let mapped: Option<String> = arg.chars().map(map).collect();
    match mapped {
        Some(s) => s,
        None if arg.chars().count() == 1 => format!("{marker}{arg}"),
        None => format!("{marker}({arg})"),
    }
}

fn superscript(c: char) -> Option<char> {
    let s = match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        'T' => 'ᵀ',
        '°' => '°',
        _ => return None,
    };
    Some(s)
}

fn subscript(c: char) -> Option<char> {
    let s = match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'n' => 'ₙ',
        'x' => 'ₓ',
        _ => return None,
    };
    Some(s)
}

/// Mathematical bold for vector names.
fn bold(c: char) -> char {
    let base = match c {
        'A'..='Z' => 0x1D400 + (c as u32 - 'A' as u32),
        'a'..='z' => 0x1D41A + (c as u32 - 'a' as u32),
        _ => return c,
    };
    char::from_u32(base).unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_formula() {
        assert_eq!(
            to_unicode(r"d = \sqrt{(x_2 - x_1)^2 + (y_2 - y_1)^2}"),
            "d = √((x₂ - x₁)² + (y₂ - y₁)²)"
        );
    }

    #[test]
    fn cosine_fraction() {
        assert_eq!(
            to_unicode(r"\frac{A\cdot B}{\|A\|\cdot\|B\|}"),
            "(A·B)/(‖A‖·‖B‖)"
        );
    }

    #[test]
    fn text_and_spacing() {
        assert_eq!(
            to_unicode(r"\text{Manhattan Distance} = |x_1 - x_2| + |y_1 - y_2|"),
            "Manhattan Distance = |x₁ - x₂| + |y₁ - y₂|"
        );
        assert_eq!(to_unicode(r"A(1,1),\quad B(3,4)"), "A(1,1),  B(3,4)");
        assert_eq!(to_unicode(r"\theta \quad x"), "θ  x");
    }

    #[test]
    fn unmappable_scripts_fall_back_to_markers() {
        assert_eq!(to_unicode(r"\sum_{i=1}^{5}"), "Σᵢ₌₁⁵");
        assert_eq!(to_unicode(r"A_{max}"), "A_(max)");
        assert_eq!(to_unicode(r"\vec{A} = [1, 2]"), "𝐀 = [1, 2]");
    }

    #[test]
    fn symbols_and_unknown_commands() {
        assert_eq!(to_unicode(r"d \approx 4.24"), "d ≈ 4.24");
        assert_eq!(to_unicode(r"\Delta x = 3"), "Δx = 3");
        assert_eq!(to_unicode(r"\cos(\theta)"), "cos(θ)");
        assert_eq!(to_unicode(r"A \cdot B = (1 \times 3)"), "A·B = (1 × 3)");
        assert_eq!(to_unicode(r"\foo"), "foo");
        assert_eq!(to_unicode(r"\text{\small Angle:} 90^\circ"), "Angle: 90°");
    }
}
