//! Dashboard page catalog
//!
//! One static entry per dashboard page. The same table drives dashboard
//! navigation, the per-page route and the embed-config section lookup.

use biportal_core::{not_found_error, PortalResult};
use serde::{Deserialize, Serialize};

/// Identifier of a dashboard page
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKey {
    Desempenho,
    Pdv,
    Clientes,
    Matriz,
    Propagandistas,
    Mapa,
    Redes,
    Rfv,
    Fidelidade,
    Bitv,
}

impl PageKey {
    /// Every key in dashboard order
    pub const ALL: [PageKey; 10] = [
        PageKey::Desempenho,
        PageKey::Pdv,
        PageKey::Clientes,
        PageKey::Matriz,
        PageKey::Propagandistas,
        PageKey::Mapa,
        PageKey::Redes,
        PageKey::Rfv,
        PageKey::Fidelidade,
        PageKey::Bitv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKey::Desempenho => "desempenho",
            PageKey::Pdv => "pdv",
            PageKey::Clientes => "clientes",
            PageKey::Matriz => "matriz",
            PageKey::Propagandistas => "propagandistas",
            PageKey::Mapa => "mapa",
            PageKey::Redes => "redes",
            PageKey::Rfv => "rfv",
            PageKey::Fidelidade => "fidelidade",
            PageKey::Bitv => "bitv",
        }
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageKey {
    type Err = String;

    // Exact match: page keys come from URL paths and are always lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

/// Static description of one dashboard page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub key: PageKey,
    pub name: &'static str,
    pub description: &'static str,
    /// Icon file under the static directory
    pub icon: &'static str,
    /// CSS classes positioning the card on the dashboard
    pub layout_class: &'static str,
    /// Section of the external report shown on this page
    pub section_id: Option<&'static str>,
}

impl Page {
    /// Route serving this page
    pub fn route_path(&self) -> String {
        format!("/pagina/{}", self.key)
    }
}

/// Ordered page table
#[derive(Debug, Clone)]
pub struct PageCatalog {
    pages: Vec<Page>,
}

impl Default for PageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PageCatalog {
    /// The portal's page table
    pub fn builtin() -> Self {
        let pages = vec![
            Page {
                key: PageKey::Desempenho,
                name: "DESEMPENHO GERAL",
                description: "Sell Out em tabelas e filtros.",
                icon: "desempenho.png",
                layout_class: "pos-desempenho left",
                section_id: Some("1e49e497e0d983a56770"),
            },
            Page {
                key: PageKey::Pdv,
                name: "PDV ANÁLISE",
                description: "Visão de positivação detalhada.",
                icon: "pdv.png",
                layout_class: "pos-pdv left",
                section_id: Some("feae6ae85cf7b9b152a5"),
            },
            Page {
                key: PageKey::Clientes,
                name: "PERFIL CLIENTES",
                description: "O famoso P9. Frequência e compra.",
                icon: "clientes.png",
                layout_class: "pos-clientes left",
                section_id: Some("58d19e2dc805cac78275"),
            },
            Page {
                key: PageKey::Matriz,
                name: "MATRIZ O.R.G",
                description: "Maturidade baseada em BCG.",
                icon: "matriz.png",
                layout_class: "pos-matriz left",
                section_id: Some("a697ebff1f1010caa86e"),
            },
            Page {
                key: PageKey::Propagandistas,
                name: "PROPAGANDISTAS",
                description: "Acompanhamento do time Out do Out.",
                icon: "propagandistas.png",
                layout_class: "pos-propaganda left",
                section_id: None,
            },
            Page {
                key: PageKey::Mapa,
                name: "MAPA ESTRATÉGICO",
                description: "Performance regional e cidades.",
                icon: "mapa.png",
                layout_class: "pos-mapa right",
                section_id: Some("ReportSectionf954b14703686e041069"),
            },
            Page {
                key: PageKey::Redes,
                name: "REDES",
                description: "Análise de grandes contas PET.",
                icon: "redes.png",
                layout_class: "pos-redes right",
                section_id: Some("6f83fd3fc7da0346493e"),
            },
            Page {
                key: PageKey::Rfv,
                name: "RFV",
                description: "Recência, Frequência e Valor.",
                icon: "rfv.png",
                layout_class: "pos-rfv right",
                section_id: None,
            },
            Page {
                key: PageKey::Fidelidade,
                name: "CLIENTES FIDELIDADE",
                description: "Clientes estratégicos e engajados.",
                icon: "fidelidade.png",
                layout_class: "pos-fidelidade right",
                section_id: None,
            },
            Page {
                key: PageKey::Bitv,
                name: "BI TV",
                description: "Painéis de visualização em TV.",
                icon: "bitv.png",
                layout_class: "pos-bitv right",
                section_id: Some("16d7a7e6f989c905e93e"),
            },
        ];
        Self { pages }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn get(&self, key: PageKey) -> Option<&Page> {
        self.pages.iter().find(|page| page.key == key)
    }

    /// Look a page up by its raw URL key
    pub fn lookup(&self, raw_key: &str) -> Option<&Page> {
        raw_key.parse::<PageKey>().ok().and_then(|key| self.get(key))
    }

    /// Report section for a raw page key, or `NotFound`
    pub fn section_for(&self, raw_key: &str) -> PortalResult<&'static str> {
        self.lookup(raw_key)
            .and_then(|page| page.section_id)
            .ok_or_else(|| {
                not_found_error!(
                    format!("report section for page '{}'", raw_key),
                    "page_catalog"
                )
            })
    }
}
