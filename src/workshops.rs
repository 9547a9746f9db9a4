use crate::models::Workshop;

struct WorkshopEntry {
    name: &'static str,
    address: &'static str,
    city: &'static str,
    phone: &'static str,
    services: &'static [&'static str],
}

impl WorkshopEntry {
    fn to_workshop(&self) -> Workshop {
        Workshop {
            name: self.name.to_string(),
            address: self.address.to_string(),
            city: self.city.to_string(),
            phone: self.phone.to_string(),
            services: self.services.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
            || self
                .services
                .iter()
                .any(|s| s.to_lowercase().contains(needle))
    }
}

// Affiliated workshops
const CATALOG: &[WorkshopEntry] = &[
    WorkshopEntry {
        name: "Auto Center Paulista",
        address: "Av. Paulista, 1500",
        city: "São Paulo",
        phone: "(11) 3251-4400",
        services: &["Troca de Óleo", "Alinhamento", "Balanceamento", "Revisão"],
    },
    WorkshopEntry {
        name: "Mecânica Irmãos Souza",
        address: "Rua Voluntários da Pátria, 820",
        city: "São Paulo",
        phone: "(11) 2281-9033",
        services: &["Troca de Pastilhas de Freio", "Suspensão", "Revisão"],
    },
    WorkshopEntry {
        name: "Pneus & Cia",
        address: "Av. Brasil, 4100",
        city: "Rio de Janeiro",
        phone: "(21) 2560-1212",
        services: &["Troca de Pneus", "Alinhamento", "Balanceamento"],
    },
    WorkshopEntry {
        name: "Oficina do Zé",
        address: "Rua da Bahia, 1020",
        city: "Belo Horizonte",
        phone: "(31) 3222-7788",
        services: &["Troca de Óleo", "Troca de Filtro de Ar", "Elétrica"],
    },
    WorkshopEntry {
        name: "Baterias Sul",
        address: "Av. Ipiranga, 6681",
        city: "Porto Alegre",
        phone: "(51) 3336-0099",
        services: &["Troca de Bateria", "Elétrica"],
    },
    WorkshopEntry {
        name: "Centro Automotivo Curitiba",
        address: "Rua XV de Novembro, 300",
        city: "Curitiba",
        phone: "(41) 3024-5566",
        services: &[
            "Revisão",
            "Troca de Óleo",
            "Troca de Pastilhas de Freio",
            "Alinhamento",
        ],
    },
];

/// Case-insensitive search over name, city and services.
/// A blank query returns the whole catalog.
pub fn search_workshops(query: &str) -> Vec<Workshop> {
    let needle = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|entry| needle.is_empty() || entry.matches(&needle))
        .map(WorkshopEntry::to_workshop)
        .collect()
}

pub fn workshop_names() -> Vec<String> {
    CATALOG.iter().map(|entry| entry.name.to_string()).collect()
}
