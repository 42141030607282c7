use crate::alerts::Alert;
use crate::models::drive::DriveCollection;

/// Generate a human-readable health report to a String.
pub fn generate(drives: &DriveCollection, alerts: &[Alert]) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  SMART Health Report — {}\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Active alerts ──────────────────────────────────────────────────
    out.push_str(&format!("── Active Alerts ({}) ─────────────────────────\n", alerts.len()));
    if alerts.is_empty() {
        out.push_str("  ● All drives nominal\n");
    } else {
        for a in alerts {
            out.push_str(&format!("  [{}]  {}{}\n", a.severity.label(), a.prefix(), a.message));
        }
    }
    out.push('\n');

    // ── Drives ─────────────────────────────────────────────────────────
    out.push_str(&format!("── Drives ({}) ────────────────────────────────\n", drives.len()));
    for drive in drives {
        let model  = drive.model.as_deref().unwrap_or("Unknown");
        let serial = drive.serial.as_deref().unwrap_or("—");
        let iface  = drive.interface_type.as_deref().unwrap_or("?");
        out.push_str(&format!(
            "  {}  {}  SMART:{}  Letters: {}\n  Model: {}  Serial: {}\n",
            drive.device_id, iface, drive.status.label().trim(), drive.letters_label(), model, serial
        ));

        if drive.dropped_slots > 0 {
            out.push_str(&format!("  ({} SMART slot(s) could not be decoded)\n", drive.dropped_slots));
        }

        let reported: Vec<_> = drive.attributes.reported().collect();
        if reported.is_empty() {
            out.push_str("  (no attributes reported)\n\n");
            continue;
        }

        out.push_str(&format!(
            "  {:>3}  {:<32} {:>5} {:>5} {:>6} {:>12}  {}\n",
            "ID", "Attribute", "Cur", "Worst", "Thresh", "Data", "OK"
        ));
        out.push_str(&format!("  {}\n", "─".repeat(72)));
        for a in reported {
            out.push_str(&format!(
                "  {:>3}  {:<32} {:>5} {:>5} {:>6} {:>12}  {}\n",
                a.id, a.name, a.current, a.worst, a.threshold, a.vendor_data,
                if a.is_ok { "yes" } else { "NO" }
            ));
        }
        out.push('\n');
    }

    if !drives.failures.is_empty() {
        out.push_str(&format!("── Skipped Drives ({}) ────────────────────────\n", drives.failures.len()));
        for f in &drives.failures {
            out.push_str(&format!("  {}  {}\n", f.device, f.message));
        }
        out.push('\n');
    }

    out.push_str("═══════════════════════════════════════════════\n");
    out
}
