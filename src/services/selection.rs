// src/services/selection.rs
// DOCUMENTATION: Result selection parsing
// PURPOSE: Turn "1,3-5" / "all" into zero-based indices into a result list

use crate::errors::PlacesError;

/// Parse a selection spec against a list of `len` items
/// DOCUMENTATION: 1-based indices and inclusive ranges, comma separated.
/// Whitespace is ignored, duplicates collapse, first-mention order is kept.
/// "all" (or "*") selects everything.
pub fn parse_selection(spec: &str, len: usize) -> Result<Vec<usize>, PlacesError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(PlacesError::InvalidInput("Empty selection".to_string()));
    }

    if spec.eq_ignore_ascii_case("all") || spec == "*" {
        return Ok((0..len).collect());
    }

    let mut selected: Vec<usize> = Vec::new();
    let mut seen = vec![false; len];

    for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, len)?, parse_index(b, len)?),
            None => {
                let idx = parse_index(token, len)?;
                (idx, idx)
            }
        };

        if start > end {
            return Err(PlacesError::InvalidInput(format!(
                "Range {} runs backwards",
                token
            )));
        }

        for idx in start..=end {
            if !seen[idx] {
                seen[idx] = true;
                selected.push(idx);
            }
        }
    }

    if selected.is_empty() {
        return Err(PlacesError::InvalidInput("Empty selection".to_string()));
    }
    Ok(selected)
}

/// Parse one 1-based position, returning the zero-based index
fn parse_index(raw: &str, len: usize) -> Result<usize, PlacesError> {
    let raw = raw.trim();
    let position: usize = raw
        .parse()
        .map_err(|_| PlacesError::InvalidInput(format!("Not a number: {:?}", raw)))?;

    if position == 0 || position > len {
        return Err(PlacesError::InvalidInput(format!(
            "{} is out of range (1-{})",
            position, len
        )));
    }
    Ok(position - 1)
}
