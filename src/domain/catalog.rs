//! Static service catalog and region list.
//!
//! Prices are rough monthly pay-as-you-go figures per billing unit.

use crate::domain::model::{ServiceCategory, ServiceDefinition};

pub const AZURE_REGIONS: [&str; 8] = [
    "East US",
    "East US 2",
    "West US",
    "West Europe",
    "North Europe",
    "Southeast Asia",
    "Central India",
    "Japan East",
];

const fn service(
    id: &'static str,
    name: &'static str,
    category: ServiceCategory,
    base_price: f64,
    unit: &'static str,
) -> ServiceDefinition {
    ServiceDefinition {
        id,
        name,
        category,
        base_price,
        unit,
    }
}

pub static PREDEFINED_SERVICES: [ServiceDefinition; 15] = [
    service("vm-linux-d2s", "Virtual Machine (Linux, D2s v3)", ServiceCategory::Compute, 70.0, "Instance"),
    service("vm-windows-d2s", "Virtual Machine (Windows, D2s v3)", ServiceCategory::Compute, 136.0, "Instance"),
    service("aks-standard", "Azure Kubernetes Service (Standard)", ServiceCategory::Compute, 72.0, "Cluster Mgmt"),
    service("app-service-p1v2", "App Service (Premium V2 P1v2)", ServiceCategory::Compute, 146.0, "Instance"),
    service("func-premium", "Azure Functions (Premium)", ServiceCategory::Compute, 150.0, "Plan"),
    service("sql-db-s0", "Azure SQL Database (Standard S0)", ServiceCategory::Database, 15.0, "Database"),
    service("sql-mi-gen5", "Azure SQL Managed Instance (Gen5)", ServiceCategory::Database, 700.0, "Instance"),
    service("cosmos-db", "Azure Cosmos DB (400 RU/s)", ServiceCategory::Database, 24.0, "100 RU/s"),
    service("blob-storage-hot", "Blob Storage (Hot, 1TB)", ServiceCategory::Storage, 20.0, "TB"),
    service("disk-p10", "Managed Disk (SSD P10 128GB)", ServiceCategory::Storage, 18.0, "Disk"),
    service("vnet", "Virtual Network", ServiceCategory::Networking, 0.0, "VNet"),
    service("app-gateway", "Application Gateway (Standard v2)", ServiceCategory::Networking, 200.0, "Gateway"),
    service("bandwidth", "Bandwidth (Outbound Data Transfer 1TB)", ServiceCategory::Networking, 80.0, "TB"),
    service("ai-search", "Azure AI Search (Basic)", ServiceCategory::AiMl, 75.0, "Service"),
    service("openai", "Azure OpenAI (S0)", ServiceCategory::AiMl, 100.0, "Unit"),
];

pub fn services() -> &'static [ServiceDefinition] {
    &PREDEFINED_SERVICES
}

pub fn regions() -> &'static [&'static str] {
    &AZURE_REGIONS
}

pub fn default_region() -> &'static str {
    AZURE_REGIONS[0]
}

pub fn find_service(id: &str) -> Option<&'static ServiceDefinition> {
    PREDEFINED_SERVICES.iter().find(|s| s.id == id)
}
