//! Person attribute parsing.
//!
//! The attribute classifier reports each person as ten free-text lines in a
//! fixed order:
//!
//! ```text
//! Male | Age18-60 | Side | Glasses: False | Hat: False |
//! HoldObjectsInFront: False | No bag | Upper: LongSleeve | Lower: Trousers | No boots
//! ```

use serde::{Deserialize, Serialize};

/// Number of lines per person description
pub const ATTRIBUTE_LINE_COUNT: usize = 10;

/// Length of the `Age` prefix stripped from the age line
const AGE_PREFIX_LEN: usize = 3;

/// Structured attributes of one person
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonAttributes {
    pub gender: String,
    pub age: String,
    pub side: bool,
    pub glasses: bool,
    pub hat: bool,
    pub holdobjectsinfront: bool,
    pub bag: bool,
    pub upper: String,
    pub lower: String,
    pub boots: bool,
}

impl PersonAttributes {
    /// Parses one person's attribute lines.
    ///
    /// # Returns
    /// * `Ok(PersonAttributes)` when all ten lines have the expected layout
    /// * `Err(String)` describing the first malformed line otherwise
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, String> {
        if lines.len() != ATTRIBUTE_LINE_COUNT {
            return Err(format!(
                "expected {ATTRIBUTE_LINE_COUNT} attribute lines, got {}",
                lines.len()
            ));
        }
        let line = |i: usize| lines[i].as_ref();

        let age = line(1)
            .get(AGE_PREFIX_LEN..)
            .ok_or_else(|| format!("age line too short: {:?}", line(1)))?;

        Ok(Self {
            gender: line(0).to_string(),
            age: age.to_string(),
            side: line(2) == "Side",
            glasses: flag(line(3))?,
            hat: flag(line(4))?,
            holdobjectsinfront: flag(line(5))?,
            bag: !leading_no(line(6)),
            upper: labelled_value(line(7))?.to_string(),
            lower: labelled_value(line(8))?.to_string(),
            boots: !leading_no(line(9)),
        })
    }
}

/// Value after the first `": "` separator, up to the next one.
fn labelled_value(line: &str) -> Result<&str, String> {
    line.split(": ")
        .nth(1)
        .ok_or_else(|| format!("missing \": \" separator in {line:?}"))
}

fn flag(line: &str) -> Result<bool, String> {
    Ok(labelled_value(line)? == "True")
}

fn leading_no(line: &str) -> bool {
    line.split(' ').next() == Some("No")
}
