/// One control in the pagination row, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous { enabled: bool },
    Number { page: u32, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// At most this many numbered buttons, centered on the current page.
const MAX_NUMBERED: u32 = 5;

/// Computes the pagination control row for a server-reported page
/// position. The window of numbered buttons is clamped to
/// `[1, total_pages]`; when it does not touch either end, the first or
/// last page is pinned with an ellipsis marking gaps wider than one
/// page. An empty result set (`total_pages == 0`) renders no controls.
pub fn page_controls(current_page: u32, total_pages: u32) -> Vec<PageControl> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current_page.clamp(1, total_pages);

    let mut start = current.saturating_sub(MAX_NUMBERED / 2).max(1);
    let end = total_pages.min(start + MAX_NUMBERED - 1);
    if end - start + 1 < MAX_NUMBERED {
        start = end.saturating_sub(MAX_NUMBERED - 1).max(1);
    }

    let mut controls = vec![PageControl::Previous { enabled: current > 1 }];

    if start > 1 {
        controls.push(PageControl::Number { page: 1, active: false });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    for page in start..=end {
        controls.push(PageControl::Number {
            page,
            active: page == current,
        });
    }

    if end < total_pages {
        if end < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Number {
            page: total_pages,
            active: false,
        });
    }

    controls.push(PageControl::Next {
        enabled: current < total_pages,
    });
    controls
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageControl::*;

    fn numbers(controls: &[PageControl]) -> Vec<u32> {
        controls
            .iter()
            .filter_map(|c| match c {
                Number { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_page_of_ten() {
        let controls = page_controls(1, 10);
        assert_eq!(
            controls,
            vec![
                Previous { enabled: false },
                Number { page: 1, active: true },
                Number { page: 2, active: false },
                Number { page: 3, active: false },
                Number { page: 4, active: false },
                Number { page: 5, active: false },
                Ellipsis,
                Number { page: 10, active: false },
                Next { enabled: true },
            ]
        );
    }

    #[test]
    fn single_page_has_no_gaps_and_both_ends_disabled() {
        let controls = page_controls(1, 1);
        assert_eq!(
            controls,
            vec![
                Previous { enabled: false },
                Number { page: 1, active: true },
                Next { enabled: false },
            ]
        );
    }

    #[test]
    fn middle_of_ten_pins_both_ends() {
        let controls = page_controls(6, 10);
        assert_eq!(numbers(&controls), vec![1, 4, 5, 6, 7, 8, 10]);
        assert_eq!(
            controls.iter().filter(|c| matches!(c, Ellipsis)).count(),
            2
        );
        assert!(matches!(controls[0], Previous { enabled: true }));
        assert!(matches!(controls[controls.len() - 1], Next { enabled: true }));
    }

    #[test]
    fn last_page_window_shifts_back() {
        let controls = page_controls(10, 10);
        assert_eq!(numbers(&controls), vec![1, 6, 7, 8, 9, 10]);
        assert!(matches!(controls[controls.len() - 1], Next { enabled: false }));
    }

    #[test]
    fn window_adjacent_to_first_page_omits_ellipsis() {
        // Window starts at 2: page 1 is pinned without a gap marker.
        let controls = page_controls(4, 6);
        assert_eq!(numbers(&controls), vec![1, 2, 3, 4, 5, 6]);
        assert!(!controls.iter().any(|c| matches!(c, Ellipsis)));
    }

    #[test]
    fn zero_total_pages_renders_nothing() {
        assert!(page_controls(1, 0).is_empty());
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        let controls = page_controls(42, 3);
        assert_eq!(numbers(&controls), vec![1, 2, 3]);
        assert!(controls
            .iter()
            .any(|c| matches!(c, Number { page: 3, active: true })));
    }
}
