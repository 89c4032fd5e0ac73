use crate::types::{OverheadBounds, ProbeSize, WireLengthRange};

/// Project a probe payload size onto the range of lengths it may have on the wire.
///
/// The range is `[size + header + overhead.min, size + header + overhead.max]`.
#[must_use]
pub fn project(size: ProbeSize, overhead: OverheadBounds, header_size: u32) -> WireLengthRange {
    let floor = size.0.saturating_add(header_size);
    WireLengthRange::new(
        floor.saturating_add(overhead.min()),
        floor.saturating_add(overhead.max()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UDP_HEADER_SIZE;
    use test_case::test_case;

    #[test_case(150, 238, 268; "reference first hop")]
    #[test_case(200, 288, 318; "reference second hop")]
    #[test_case(103, 191, 221; "narrow first hop")]
    #[test_case(106, 194, 224; "narrow second hop")]
    fn test_project(size: u32, low: u32, high: u32) {
        let overhead = OverheadBounds::new(80, 110).unwrap();
        let range = project(ProbeSize(size), overhead, UDP_HEADER_SIZE);
        assert_eq!(low, range.low());
        assert_eq!(high, range.high());
    }

    #[test]
    fn test_project_no_overhead() {
        let overhead = OverheadBounds::new(0, 0).unwrap();
        let range = project(ProbeSize(64), overhead, 0);
        assert_eq!(WireLengthRange::new(64, 64), range);
    }
}
