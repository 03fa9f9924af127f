// src/models/catalog.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    OilChange,
    BrakeService,
    EngineDiagnostics,
    TireService,
    BatteryReplacement,
    TransmissionService,
    AcRepair,
    GeneralInspection,
    Bodywork,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 10] = [
        ServiceType::OilChange,
        ServiceType::BrakeService,
        ServiceType::EngineDiagnostics,
        ServiceType::TireService,
        ServiceType::BatteryReplacement,
        ServiceType::TransmissionService,
        ServiceType::AcRepair,
        ServiceType::GeneralInspection,
        ServiceType::Bodywork,
        ServiceType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::OilChange => "Oil Change",
            ServiceType::BrakeService => "Brake Service",
            ServiceType::EngineDiagnostics => "Engine Diagnostics",
            ServiceType::TireService => "Tire Service",
            ServiceType::BatteryReplacement => "Battery Replacement",
            ServiceType::TransmissionService => "Transmission Service",
            ServiceType::AcRepair => "AC Repair",
            ServiceType::GeneralInspection => "General Inspection",
            ServiceType::Bodywork => "Bodywork",
            ServiceType::Other => "Other",
        }
    }
}

pub const VEHICLE_BRANDS: &[&str] = &[
    "Toyota",
    "Honda",
    "Nissan",
    "Hyundai",
    "Kia",
    "Ford",
    "Chevrolet",
    "Volkswagen",
    "Mercedes-Benz",
    "BMW",
    "Audi",
    "Mazda",
    "Mitsubishi",
    "Peugeot",
    "Renault",
    "Suzuki",
    "Subaru",
    "Lexus",
    "Land Rover",
    "Other",
];

#[derive(Debug, Serialize, Clone)]
pub struct ServiceTypeEntry {
    pub id: ServiceType,
    pub label: &'static str,
}

pub fn service_type_entries() -> Vec<ServiceTypeEntry> {
    ServiceType::ALL
        .iter()
        .map(|id| ServiceTypeEntry { id: *id, label: id.label() })
        .collect()
}

pub fn is_known_brand(brand: &str) -> bool {
    VEHICLE_BRANDS.iter().any(|b| b.eq_ignore_ascii_case(brand.trim()))
}
