//! Notation block header parsing
//!
//! A block is scanned line by line. `X:`, `M:` and `K:` lines fill the
//! setting's id, meter and key (a later line of the same field wins); every
//! non-empty line, headers included, is kept verbatim in `notation`.

use tunes_common::TuneSetting;

/// Header fields lifted out of a notation block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    ReferenceNumber,
    Meter,
    Key,
}

impl HeaderField {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "X" => Some(Self::ReferenceNumber),
            "M" => Some(Self::Meter),
            "K" => Some(Self::Key),
            _ => None,
        }
    }
}

/// Build a [`TuneSetting`] from one raw notation block
pub fn parse_setting(block: &str) -> TuneSetting {
    let mut setting = TuneSetting::default();
    let mut lines = Vec::new();

    for line in block.split('\n').filter(|line| !line.is_empty()) {
        if let Some((tag, value)) = line.split_once(':') {
            let value = Some(value.trim().to_string());
            match HeaderField::from_tag(tag) {
                Some(HeaderField::ReferenceNumber) => setting.id = value,
                Some(HeaderField::Meter) => setting.meter = value,
                Some(HeaderField::Key) => setting.key = value,
                None => {}
            }
        }
        lines.push(line);
    }

    setting.notation = lines.join("\n");
    setting
}
