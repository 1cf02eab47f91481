//! Change detection between streamed partial analyses.

use crate::checkins::checkins_model::PartialCheckInAnalysis;

/// Whether `next` carries real progress over the last relayed partial.
///
/// An update is meaningful when any scalar field differs from the previous
/// value and is non-empty, or when any list field has a different length. A
/// missing list counts as empty. With no previous partial, the first snapshot
/// with any content is meaningful.
pub fn is_meaningful_update(
    previous: Option<&PartialCheckInAnalysis>,
    next: &PartialCheckInAnalysis,
) -> bool {
    let empty = PartialCheckInAnalysis::default();
    let previous = previous.unwrap_or(&empty);

    scalar_changed(&previous.overall_summary, &next.overall_summary)
        || scalar_changed(&previous.weekly_focus, &next.weekly_focus)
        || scalar_changed(&previous.motivation, &next.motivation)
        || list_len(&previous.celebrations) != list_len(&next.celebrations)
        || list_len(&previous.insights) != list_len(&next.insights)
        || list_len(&previous.recommendations) != list_len(&next.recommendations)
        || list_len(&previous.resources) != list_len(&next.resources)
}

fn scalar_changed(previous: &Option<String>, next: &Option<String>) -> bool {
    match next.as_deref() {
        Some(value) if !value.is_empty() => previous.as_deref() != Some(value),
        _ => false,
    }
}

fn list_len<T>(list: &Option<Vec<T>>) -> usize {
    list.as_ref().map_or(0, Vec::len)
}
