use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::constants::{DEFAULT_FIRST_CHANNEL, DEFAULT_LAST_CHANNEL};
use super::error::ChannelSelectionError;

/// An ordered list of channels to extract.
///
/// Written as a single channel (`3`), a comma separated list (`4,3,8,9`) or an inclusive
/// range (`0-15`). Order is kept and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelSelection {
    channels: Vec<u32>,
    text: String,
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self {
            channels: (DEFAULT_FIRST_CHANNEL..=DEFAULT_LAST_CHANNEL).collect(),
            text: format!("{DEFAULT_FIRST_CHANNEL}-{DEFAULT_LAST_CHANNEL}"),
        }
    }
}

impl ChannelSelection {
    pub fn channels(&self) -> &[u32] {
        &self.channels
    }
}

impl FromStr for ChannelSelection {
    type Err = ChannelSelectionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ChannelSelectionError::Empty);
        }

        let channels: Vec<u32> = if text.matches('-').count() == 1 {
            let (first, last) = text.split_once('-').ok_or(ChannelSelectionError::Empty)?;
            let first: u32 = first.trim().parse()?;
            let last: u32 = last.trim().parse()?;
            if last < first {
                return Err(ChannelSelectionError::ReversedRange(first, last));
            }
            (first..=last).collect()
        } else {
            text.split(',')
                .map(|entry| entry.trim().parse::<u32>())
                .collect::<Result<_, _>>()?
        };

        Ok(Self {
            channels,
            text: text.to_string(),
        })
    }
}

impl TryFrom<String> for ChannelSelection {
    type Error = ChannelSelectionError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChannelSelection> for String {
    fn from(value: ChannelSelection) -> Self {
        value.text
    }
}

impl Display for ChannelSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_channel() {
        let selection: ChannelSelection = "3".parse().unwrap();
        assert_eq!(selection.channels(), &[3]);
    }

    #[test]
    fn test_channel_list() {
        let selection: ChannelSelection = "4,3,8,9,3".parse().unwrap();
        assert_eq!(selection.channels(), &[4, 3, 8, 9, 3]);
    }

    #[test]
    fn test_channel_range() {
        let selection: ChannelSelection = "2-5".parse().unwrap();
        assert_eq!(selection.channels(), &[2, 3, 4, 5]);
        let selection: ChannelSelection = "7-7".parse().unwrap();
        assert_eq!(selection.channels(), &[7]);
    }

    #[test]
    fn test_default_selection() {
        let selection = ChannelSelection::default();
        assert_eq!(selection.channels(), (0..16).collect::<Vec<u32>>().as_slice());
        assert_eq!(selection.to_string(), "0-15");
    }

    #[test]
    fn test_bad_selections() {
        assert_eq!(
            "".parse::<ChannelSelection>(),
            Err(ChannelSelectionError::Empty)
        );
        assert_eq!(
            "5-2".parse::<ChannelSelection>(),
            Err(ChannelSelectionError::ReversedRange(5, 2))
        );
        assert!(matches!(
            "1,two".parse::<ChannelSelection>(),
            Err(ChannelSelectionError::ParsingError(_))
        ));
        // Two dashes is neither a range nor a list
        assert!("1-2-3".parse::<ChannelSelection>().is_err());
        assert!("-1".parse::<ChannelSelection>().is_err());
    }

    #[test]
    fn test_yaml_form() {
        let selection: ChannelSelection = "1,2".parse().unwrap();
        let yaml = serde_yaml::to_string(&selection).unwrap();
        let back: ChannelSelection = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.channels(), &[1, 2]);
    }
}
