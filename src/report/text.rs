use crate::core::overlap::OverlapResult;
use crate::core::threshold::ThresholdResult;
use anyhow::Result;
use std::fmt::Write;

/// Membership report: the pairs whose average score met the threshold, or
/// a single line saying none did
pub fn generate_membership_report(result: &ThresholdResult) -> Result<String> {
    let mut output = String::new();

    if result.is_empty() {
        write!(
            &mut output,
            "The given threshold value of {}% is too high. No OG comparisons met this criteria.",
            result.threshold_percent
        )?;
        return Ok(output);
    }

    writeln!(
        &mut output,
        "The orthologous clustering similarity comparisons that met the desired threshold value of {}% are listed below:",
        result.threshold_percent
    )?;
    writeln!(&mut output)?;

    for (pair, avg) in &result.passing {
        writeln!(
            &mut output,
            "For the {} comparison, the average score value is: {}",
            pair,
            format_score(*avg)
        )?;
    }

    Ok(output)
}

/// Shortest round-trip rendering of a score. Whole numbers keep `.0`, and
/// exponents below -4 or from 16 up switch to `1e-05` / `1e+16` notation.
pub fn format_score(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..16).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exponent.abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{}0.{}{}", sign, zeros, digits);
    }

    let int_len = exponent as usize + 1;
    if digits.len() <= int_len {
        format!("{}{}{}.0", sign, digits, "0".repeat(int_len - digits.len()))
    } else {
        format!("{}{}.{}", sign, &digits[..int_len], &digits[int_len..])
    }
}

/// Number of distinct first-tool groups per pair that met the overlap threshold
pub fn generate_overlap_summary(result: &OverlapResult) -> Result<String> {
    let mut output = String::new();

    writeln!(
        &mut output,
        "The number of orthologous clusters in each pairwise comparison of two orthologous clustering"
    )?;
    writeln!(
        &mut output,
        "programs that met the desired threshold value of {}% are listed below:",
        result.threshold_percent
    )?;
    writeln!(&mut output)?;

    for (pair, count) in result.summary_counts() {
        writeln!(&mut output, "For the {} comparison,", pair)?;
        writeln!(
            &mut output,
            "\tthe number of OGs that meet the threshold similarity is: {}",
            count
        )?;
    }

    Ok(output)
}
