//! Plain-text rendering of controller state for the terminal.

use std::fmt::Write as _;

use client_core::format_timestamp;
use shared::protocol::{EmailTrackingEntity, MailResponse};

use crate::controller::state::{LookupStatus, TrackingData};

const PLACEHOLDER: &str = "-";

fn or_placeholder(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or(PLACEHOLDER)
}

fn display_time(value: Option<&str>) -> String {
    format_timestamp(value).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn render_send_response(response: Option<&MailResponse>) -> String {
    let Some(response) = response else {
        return "No email sent yet.".to_string();
    };

    let mut out = format!("[{}] {}", response.status, response.message);
    if let Some(message_id) = response.message_id.as_deref() {
        let _ = write!(out, "\nTracking ID: {message_id}");
    }
    out
}

pub fn render_tracking_data(data: &TrackingData) -> String {
    match (data.status, data.entity.as_ref()) {
        (LookupStatus::Success, Some(entity)) => {
            let mut out = format!("[{}] {}\n", data.status.as_str(), data.message);
            out.push_str(&render_entity(entity));
            out
        }
        (LookupStatus::Idle, _) => "No status checked yet.".to_string(),
        _ => format!("[{}] {}", data.status.as_str(), data.message),
    }
}

fn render_entity(entity: &EmailTrackingEntity) -> String {
    let location = match (entity.client_city.as_deref(), entity.client_country.as_deref()) {
        (Some(city), Some(country)) => format!("{city}, {country}"),
        (city, country) => or_placeholder(city.or(country)).to_string(),
    };
    let rows = [
        ("Tracking ID", entity.tracking_id.clone()),
        ("Recipient", entity.recipient_email.clone()),
        ("Batch ID", entity.batch_id.clone()),
        ("Sent", display_time(entity.sent_timestamp.as_deref())),
        ("Opens", entity.open_count.to_string()),
        ("First open", display_time(entity.first_open_timestamp.as_deref())),
        ("Last open", display_time(entity.last_open_timestamp.as_deref())),
        ("Browser", or_placeholder(entity.client_browser.as_deref()).to_string()),
        ("Device", or_placeholder(entity.client_device.as_deref()).to_string()),
        ("User agent", or_placeholder(entity.client_user_agent.as_deref()).to_string()),
        ("IP address", or_placeholder(entity.client_ip_address.as_deref()).to_string()),
        ("Location", location),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<12} {value}");
    }
    out
}

pub fn render_tracking_table(records: &[EmailTrackingEntity], error: Option<&str>) -> String {
    if let Some(error) = error {
        return format!("Error: {error}");
    }
    if records.is_empty() {
        return "No tracked emails yet.".to_string();
    }

    let header = ["TRACKING ID", "RECIPIENT", "OPENS", "SENT", "LAST OPEN"];
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|record| {
            [
                record.tracking_id.clone(),
                record.recipient_email.clone(),
                record.open_count.to_string(),
                display_time(record.sent_timestamp.as_deref()),
                display_time(record.last_open_timestamp.as_deref()),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    let opened = records.iter().filter(|record| record.was_opened()).count();
    let _ = write!(out, "{} tracked, {} opened", records.len(), opened);
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
