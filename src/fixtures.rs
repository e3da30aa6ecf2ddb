//! Fixture datasets
//!
//! Hard-coded sample data standing in for a backend. Alert and report
//! timestamps are relative to a reference instant supplied by the caller so
//! every fetch within one store instance sees the same values.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use crate::models::{
    AlertKind, EmergencyAlert, EmergencyReport, Guideline, GuidelineCategory, ReportStatus, User,
};

/// Password accepted by every fixture user in the fixture auth variant
pub const DEFAULT_SHARED_PASSWORD: &str = "password123";

/// Alerts published to the dashboard, newest first.
pub fn alerts(now: DateTime<Utc>) -> Vec<EmergencyAlert> {
    vec![
        EmergencyAlert {
            id: "1".into(),
            kind: AlertKind::Danger,
            title: "Flash Flood Warning".into(),
            message: "Flash flood warning issued for downtown area. Avoid low-lying areas and stay indoors.".into(),
            location: Some("Downtown".into()),
            timestamp: now,
            is_active: true,
        },
        EmergencyAlert {
            id: "2".into(),
            kind: AlertKind::Warning,
            title: "High Wind Advisory".into(),
            message: "Strong winds expected this afternoon. Secure outdoor items and use caution when driving.".into(),
            location: None,
            timestamp: now - Duration::hours(1),
            is_active: true,
        },
        EmergencyAlert {
            id: "3".into(),
            kind: AlertKind::Info,
            title: "Power Outage Update".into(),
            message: "Crews working to restore power in the northern district. Estimated resolution by 8 PM.".into(),
            location: Some("Northern District".into()),
            timestamp: now - Duration::hours(2),
            is_active: true,
        },
        EmergencyAlert {
            id: "4".into(),
            kind: AlertKind::Success,
            title: "Road Cleared".into(),
            message: "Main Street is now open after earlier accident. Traffic flowing normally.".into(),
            location: Some("Main Street".into()),
            timestamp: now - Duration::hours(3),
            is_active: false,
        },
    ]
}

/// Previously filed reports.
pub fn reports(now: DateTime<Utc>) -> Vec<EmergencyReport> {
    vec![
        EmergencyReport {
            id: "1".into(),
            user_id: "1".into(),
            kind: "Flooding".into(),
            description: "Water rising rapidly in basement level of apartment building".into(),
            location: "123 Main St, Apt B".into(),
            status: ReportStatus::InProgress,
            timestamp: now - Duration::days(1),
            contact: "0803 123 4567".into(),
        },
        EmergencyReport {
            id: "2".into(),
            user_id: "1".into(),
            kind: "Downed Power Line".into(),
            description: "Power line down across the road after storm".into(),
            location: "Corner of Oak and Pine".into(),
            status: ReportStatus::Resolved,
            timestamp: now - Duration::days(2),
            contact: "0703 123 4567".into(),
        },
    ]
}

/// Users known to the fixture auth variant.
pub fn users() -> Vec<User> {
    vec![
        User::with_id("1", "Jane Smith", "jane@example.com"),
        User::with_id("2", "John Doe", "john@example.com"),
    ]
}

fn category(id: &str, title: &str, icon: &str, description: &str) -> GuidelineCategory {
    GuidelineCategory {
        id: id.into(),
        title: title.into(),
        icon: icon.into(),
        description: description.into(),
    }
}

fn guideline(id: &str, category_id: &str, title: &str, steps: &[&str], info: Option<&str>) -> Guideline {
    Guideline {
        id: id.into(),
        category_id: category_id.into(),
        title: title.into(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        additional_info: info.map(str::to_string),
    }
}

/// Guideline categories in display order.
pub static CATEGORIES: Lazy<Vec<GuidelineCategory>> = Lazy::new(|| {
    vec![
        category("flood", "Flood Safety", "droplet", "Guidelines for flooding during rainy season"),
        category("security", "Security Emergency", "shield", "Safety guidelines for security incidents"),
        category("medical", "Medical Emergency", "stethoscope", "First aid and medical emergency procedures"),
        category("fire", "Fire Safety", "flame", "Fire prevention and emergency response"),
        category("weather", "Weather Alerts", "cloud-lightning", "Guidelines for severe weather conditions"),
        category("evacuation", "Evacuation Routes", "log-out", "Safe evacuation procedures by region"),
    ]
});

/// Guidelines, one per category.
pub static GUIDELINES: Lazy<Vec<Guideline>> = Lazy::new(|| {
    vec![
        guideline(
            "1",
            "flood",
            "Rainy Season Preparedness",
            &[
                "Monitor NIMET weather forecasts regularly",
                "Clear drainage systems around your property",
                "Store important documents in waterproof containers",
                "Prepare an emergency kit with essential items",
                "Know your area's flood risk and evacuation routes",
            ],
            Some("Contact your local NEMA office for area-specific guidance"),
        ),
        guideline(
            "2",
            "security",
            "Personal Safety Guidelines",
            &[
                "Keep emergency numbers saved on your phone",
                "Stay aware of your surroundings at all times",
                "Avoid traveling alone at night",
                "Keep family and friends informed of your movements",
                "Have a plan for emergency situations",
            ],
            None,
        ),
        guideline(
            "3",
            "medical",
            "Medical Emergency Response",
            &[
                "Call 112 for immediate medical assistance",
                "Know the location of nearest hospitals",
                "Keep a first aid kit readily available",
                "Learn basic first aid procedures",
                "Keep important medical information accessible",
            ],
            Some("Download the NCDC app for health emergency updates"),
        ),
        guideline(
            "4",
            "fire",
            "Fire Emergency Response",
            &[
                "Call 112 or your local fire service immediately when a fire is detected",
                "Know the location of the nearest fire exits and extinguishers",
                "Keep a fire extinguisher and smoke alarms in working condition",
                "Learn how to use a fire extinguisher and follow evacuation protocols",
                "Keep emergency contacts and evacuation plans easily accessible",
            ],
            Some("Download the FFS app for fire emergency updates"),
        ),
        guideline(
            "5",
            "weather",
            "Weather Emergency Response",
            &[
                "Stay informed through official weather alerts and emergency apps",
                "Know safe shelter locations for storms, floods, or extreme weather",
                "Keep an emergency kit with essentials like water, flashlight, and batteries",
                "Follow evacuation orders or shelter-in-place instructions promptly",
                "Keep important documents and emergency contacts in a waterproof folder",
            ],
            Some("Download the NWS app for weather emergency updates"),
        ),
        guideline(
            "6",
            "evacuation",
            "Safe Evacuation Procedures",
            &[
                "Follow official evacuation orders without delay",
                "Know your primary and alternative evacuation routes",
                "Keep a go-bag ready with essentials like ID, medication, and water",
                "Secure your home if time allows: turn off gas, water, and electricity",
                "Stay informed through local news and emergency services during evacuation",
            ],
            Some("Download the SEMA app for evacuation area-specific guidance"),
        ),
    ]
});
