use crate::domain::{ConfirmationResultItem, ValidationError};

/// Endpoint-neutral view of one confirmation result entry.
pub struct WireConfirmationItem {
    pub id: Option<String>,
    pub confirmed: Option<bool>,
}

pub fn decode_confirmation_items(
    items: impl IntoIterator<Item = WireConfirmationItem>,
    id_field: &'static str,
) -> Result<Vec<ConfirmationResultItem>, ValidationError> {
    items
        .into_iter()
        .map(|item| ConfirmationResultItem::new(item.id, item.confirmed, id_field))
        .collect()
}
