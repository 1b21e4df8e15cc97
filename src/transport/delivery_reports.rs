use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TransportError;
use super::confirmation::{WireConfirmationItem, decode_confirmation_items};
use super::timestamp::{format_timestamp, parse_optional_timestamp};
use crate::domain::{
    ConfirmationResult, DeliveryReport, DeliveryReportConfirmation, DeliveryReportList,
    DeliveryReportParts, MessageStatus, ValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireDeliveryReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_report_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_received: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireDeliveryReportList {
    #[serde(default)]
    delivery_reports: Option<Vec<WireDeliveryReport>>,
}

#[derive(Debug, Clone, Serialize)]
struct WireDeliveryReportConfirmation<'a> {
    delivery_report_ids: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct WireDeliveryReportConfirmationItem {
    #[serde(default)]
    delivery_report_id: Option<String>,
    #[serde(default)]
    confirmed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireDeliveryReportConfirmationResult {
    #[serde(default)]
    delivery_report_ids: Option<Vec<WireDeliveryReportConfirmationItem>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Vec<String>>,
}

impl From<&DeliveryReport> for WireDeliveryReport {
    fn from(report: &DeliveryReport) -> Self {
        Self {
            delivery_report_id: Some(report.delivery_report_id().to_owned()),
            message_id: Some(report.message_id().to_owned()),
            source_number: Some(report.source_number().to_owned()),
            date_received: Some(format_timestamp(&report.date_received())),
            delay: report.delay(),
            status: Some(report.status().as_wire().to_owned()),
            metadata: Some(report.metadata().clone()),
        }
    }
}

impl TryFrom<WireDeliveryReport> for DeliveryReport {
    type Error = ValidationError;

    fn try_from(wire: WireDeliveryReport) -> Result<Self, Self::Error> {
        DeliveryReport::from_parts(DeliveryReportParts {
            date_received: parse_optional_timestamp("date_received", wire.date_received.as_deref())?,
            delivery_report_id: wire.delivery_report_id,
            message_id: wire.message_id,
            source_number: wire.source_number,
            delay: wire.delay,
            status: wire.status.as_deref().map(MessageStatus::from_wire),
            metadata: wire.metadata,
        })
    }
}

pub fn decode_delivery_report_list(json: &[u8]) -> Result<DeliveryReportList, TransportError> {
    let wire: WireDeliveryReportList = serde_json::from_slice(json)?;
    let delivery_reports = wire
        .delivery_reports
        .ok_or(ValidationError::Missing {
            field: "delivery_reports",
        })?
        .into_iter()
        .map(DeliveryReport::try_from)
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(DeliveryReportList { delivery_reports })
}

#[cfg(test)]
fn encode_delivery_report(report: &DeliveryReport) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&WireDeliveryReport::from(report))?)
}

#[cfg(test)]
fn decode_delivery_report(json: &[u8]) -> Result<DeliveryReport, TransportError> {
    let wire: WireDeliveryReport = serde_json::from_slice(json)?;
    Ok(DeliveryReport::try_from(wire)?)
}

pub fn encode_delivery_report_confirmation(
    confirmation: &DeliveryReportConfirmation,
) -> Result<Vec<u8>, TransportError> {
    Ok(serde_json::to_vec(&WireDeliveryReportConfirmation {
        delivery_report_ids: confirmation.delivery_report_ids(),
    })?)
}

pub fn decode_delivery_report_confirmation_result(
    json: &[u8],
) -> Result<ConfirmationResult, TransportError> {
    let wire: WireDeliveryReportConfirmationResult = serde_json::from_slice(json)?;
    let items = wire
        .delivery_report_ids
        .ok_or(ValidationError::Missing {
            field: "delivery_report_ids",
        })?
        .into_iter()
        .map(|item| WireConfirmationItem {
            id: item.delivery_report_id,
            confirmed: item.confirmed,
        });

    Ok(ConfirmationResult {
        items: decode_confirmation_items(items, "delivery_report_id")?,
        message: wire.message,
        details: wire.details.unwrap_or_default(),
    })
}
