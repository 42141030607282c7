use crate::config::AlertConfig;
use crate::models::drive::DriveCollection;
use crate::models::smart::DriveStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info     => "INFO",
            Severity::Warning  => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub device:   String,
    pub message:  String,
}

impl Alert {
    fn new(severity: Severity, device: &str, message: String) -> Self {
        Self { severity, device: device.to_string(), message }
    }

    pub fn prefix(&self) -> String {
        format!("[{}] ", self.device)
    }
}

/// Evaluate alert conditions over assembled drives.
/// Returns a freshly built list sorted Critical → Warning → Info.
pub fn evaluate(drives: &DriveCollection, cfg: &AlertConfig) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();

    for drive in drives {
        let dev = drive.device_id.as_str();

        match drive.status {
            DriveStatus::Failed => alerts.push(Alert::new(
                Severity::Critical, dev, "drive predicts its own failure".into(),
            )),
            DriveStatus::Unknown if cfg.report_unknown_status => alerts.push(Alert::new(
                Severity::Info, dev, "no failure prediction available".into(),
            )),
            _ => {}
        }

        for attr in drive.failing_attributes() {
            alerts.push(Alert::new(
                Severity::Critical,
                dev,
                format!("{} ({}) failure imminent", attr.name, attr.id),
            ));
        }

        for attr in drive.attributes.iter().filter(|a| a.is_ok) {
            if attr.is_below_threshold() {
                alerts.push(Alert::new(
                    Severity::Warning,
                    dev,
                    format!("{} ({}) at {} ≤ threshold {}", attr.name, attr.id, attr.current, attr.threshold),
                ));
            } else if attr.is_near_threshold(cfg.threshold_margin) {
                alerts.push(Alert::new(
                    Severity::Warning,
                    dev,
                    format!("{} ({}) at {}, within {} of threshold {}",
                        attr.name, attr.id, attr.current, cfg.threshold_margin, attr.threshold),
                ));
            }
        }
    }

    for failure in &drives.failures {
        alerts.push(Alert::new(Severity::Warning, &failure.device, failure.message.clone()));
    }

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}
