//! Clinical vocabularies offered by the forms.
//!
//! Values are sent to the backend verbatim, so they stay in the language the
//! records are kept in.

/// Chronic conditions relevant to wound healing.
pub const CHRONIC_DISEASES: &[&str] = &[
    "Diabetes Mellitus",
    "Insuficiencia Venosa Crónica",
    "Insuficiencia Arterial Periférica",
    "Hipertensión Arterial",
    "Obesidad",
    "Insuficiencia Renal Crónica",
    "Cirrosis Hepática",
    "Artritis Reumatoide",
    "Cáncer en tratamiento activo",
    "Trastornos Autoinmunes",
    "Enfermedad Pulmonar Crónica",
    "Cardiopatías Graves",
];

/// Habits and treatments that predispose to poor healing.
pub const PREDISPOSITIONS: &[&str] = &[
    "Tabaquismo",
    "Alcoholismo Crónico",
    "Drogadicción",
    "Inmovilidad",
    "Desnutrición",
    "Uso prolongado de Corticosteroides",
    "Uso de Inmunosupresores",
    "Radioterapia/Quimioterapia reciente",
];

/// Wound border descriptors.
pub const BORDERS: &[&str] = &["Regulares", "Irregulares", "Engrosados", "Invertidos", "Socavados"];

/// Surrounding skin descriptors.
pub const SURROUNDING_SKIN: &[&str] = &["Sana", "Eritematosa", "Descamativa", "Macerada"];

/// Edema grades.
pub const EDEMA: &[&str] = &["+", "++", "+++"];

/// Exudate amount.
pub const EXUDATE_AMOUNT: &[&str] = &["Escaso", "Moderado", "Abundante"];

/// Exudate type.
pub const EXUDATE_TYPE: &[&str] = &["Seroso", "Purulento", "Hemorrágico"];

/// Dressing categories with their specific dressings.
pub const DRESSINGS: &[(&str, &[&str])] = &[
    (
        "Apósitos Pasivos",
        &[
            "Gasas estériles",
            "Compresas de algodón",
            "Tull graso",
            "Películas transparentes de poliuretano",
        ],
    ),
    (
        "Apósitos Interactivos",
        &[
            "Hidrocoloides finos",
            "Hidrocoloides gruesos",
            "Hidrocoloides con plata",
            "Hidrogeles en gel",
            "Hidrogeles en lámina",
            "Espumas con borde adhesivo",
            "Espumas sin borde adhesivo",
            "Espumas con plata",
            "Alginato de calcio",
            "Alginato de sodio",
            "Alginato con plata",
            "Hidrofibra con plata",
            "Celulosa oxidada regenerada",
        ],
    ),
    (
        "Apósitos Avanzados",
        &["Colágeno", "Matrices de regeneración dérmica", "Factores de crecimiento"],
    ),
    (
        "Apósitos Antimicrobianos",
        &[
            "Apósitos con plata",
            "Apósitos con yodo",
            "Cadexómero de yodo",
            "Soluciones impregnadas en gasa",
            "PHMB",
            "Miel de Manuka",
            "Apósitos con DACC",
        ],
    ),
    (
        "Apósitos Hemostáticos",
        &["Gasa con caolín", "Apósitos con quitosano", "Esponjas hemostáticas"],
    ),
    (
        "Apósitos Específicos",
        &[
            "Apósitos de carbón activado",
            "Apósitos con silicona",
            "Terapia de Presión Negativa (TPN)",
            "Apósito de regeneración epidérmica",
            "Apósitos para quemaduras con sulfadiazina argéntica",
            "Apósito biológico",
        ],
    ),
];

/// Returns the dressing category names.
pub fn dressing_categories() -> impl Iterator<Item = &'static str> {
    DRESSINGS.iter().map(|(category, _)| *category)
}

/// Returns the specific dressings of a category.
#[must_use]
pub fn dressings_in(category: &str) -> Option<&'static [&'static str]> {
    DRESSINGS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, items)| *items)
}

/// Returns the category a specific dressing belongs to.
#[must_use]
pub fn category_of(dressing: &str) -> Option<&'static str> {
    DRESSINGS
        .iter()
        .find(|(_, items)| items.contains(&dressing))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dressing_lookup() {
        assert_eq!(dressing_categories().count(), 6);
        assert!(dressings_in("Apósitos Avanzados").unwrap().contains(&"Colágeno"));
        assert!(dressings_in("Vendas").is_none());
        assert_eq!(category_of("PHMB"), Some("Apósitos Antimicrobianos"));
    }

    #[test]
    fn test_specific_dressings_are_unique() {
        let mut all: Vec<&str> = DRESSINGS.iter().flat_map(|(_, items)| items.iter().copied()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
