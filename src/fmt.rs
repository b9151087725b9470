/// Group the digits of a non-negative integer string with `.` every three places.
fn group_thousands(int_part: &str) -> String {
    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Format a float as a Brazilian real amount: R$ 1.234,56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let negative = val < 0.0 && cents != "0.00";
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let grouped = group_thousands(int_part);

    if negative {
        format!("R$ -{grouped},{dec_part}")
    } else {
        format!("R$ {grouped},{dec_part}")
    }
}

/// Format a count with `.` thousands separators: 12.345
pub fn number(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Short label for chart bars: 950, 1,2 mil, 3,4 mi, 1,1 bi
pub fn compact(val: f64) -> String {
    let abs = val.abs();
    // each threshold is where the smaller unit would round up to 1000
    let (scaled, suffix) = if abs >= 999.95e6 {
        (abs / 1e9, " bi")
    } else if abs >= 999.95e3 {
        (abs / 1e6, " mi")
    } else if abs >= 999.5 {
        (abs / 1e3, " mil")
    } else {
        let whole = format!("{abs:.0}");
        return if val < 0.0 && whole != "0" {
            format!("-{whole}")
        } else {
            whole
        };
    };
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}{}{suffix}", format!("{scaled:.1}").replace('.', ","))
}
