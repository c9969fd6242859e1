//! Vaccine catalog.
//!
//! Keyword matching identifies which biological a free-text cell refers
//! to; the remaining fields feed the output row and the nursing note.
//! Display names and descriptions stay in Spanish — they are values the
//! vaccination registry expects verbatim.

/// One supported vaccine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vaccine {
    pub id: &'static str,
    /// Match order matters: first catalog entry with a contained keyword
    /// wins.
    pub keywords: &'static [&'static str],
    pub display_name: &'static str,
    /// Phrase inserted into the nursing note ("la influenza (INFLUVAC)").
    pub description: &'static str,
    pub default_arm: &'static str,
    pub syringe: &'static str,
    pub sample_lot: &'static str,
}

pub const VACCINE_CATALOG: &[Vaccine] = &[
    Vaccine {
        id: "INFLUVAC",
        keywords: &["INFLUVAC", "INFLUENZA"],
        display_name: "INFLUVAC",
        description: "la influenza (INFLUVAC)",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "K17",
    },
    Vaccine {
        id: "VPH",
        keywords: &["VPH", "GARDASIL", "PAPILOMA"],
        display_name: "GARDASIL 9",
        description: "el Virus del Papiloma Humano (GARDASIL 9)",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "Y000435",
    },
    Vaccine {
        id: "NEUMO",
        keywords: &["NEUMO", "NEUMOCOCO", "PNEUMO", "NEUMONIA"],
        display_name: "NEUMOCOCO",
        description: "el neumococo (PREVENAR 15)",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "NEUMO23",
    },
    Vaccine {
        id: "HEPATITIS_B",
        keywords: &["HEPATITIS B", "HEPATITIS-B", "HEP B", "HB", "HEPATITIS"],
        display_name: "HEPATITIS B",
        description: "la hepatitis B",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "HB2024",
    },
    Vaccine {
        id: "TETANOS",
        keywords: &["TETANOS", "TÉTANOS", "TD", "TDAP", "ANTITETANICA"],
        display_name: "TÉTANOS",
        description: "el tétanos",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "TD2024",
    },
    Vaccine {
        id: "COVID",
        keywords: &["COVID", "COVID-19", "COVID19", "SARS-COV-2", "CORONAVIRUS"],
        display_name: "COVID-19",
        description: "el COVID-19",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "COV2024",
    },
    Vaccine {
        id: "FIEBRE_AMARILLA",
        keywords: &["FIEBRE AMARILLA", "YELLOW FEVER", "FA", "F.AMARILLA"],
        display_name: "FIEBRE AMARILLA",
        description: "la fiebre amarilla",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "FA2024",
    },
    Vaccine {
        id: "SARAMPION",
        keywords: &["SARAMPION", "SARAMPIÓN", "MEASLES", "SRP", "TRIPLE VIRAL"],
        display_name: "SARAMPIÓN",
        description: "el sarampión",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "SRP2024",
    },
    Vaccine {
        id: "VARICELA",
        keywords: &["VARICELA", "CHICKENPOX"],
        display_name: "VARICELA",
        description: "la varicela",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "VAR2024",
    },
    Vaccine {
        id: "MENINGITIS",
        keywords: &["MENINGITIS", "MENINGOCOCO", "MENINGOCOCICA"],
        display_name: "MENINGITIS",
        description: "la meningitis",
        default_arm: "IZQUIERDO",
        syringe: "JERINGA PRELLENADA",
        sample_lot: "MEN2024",
    },
];

/// Identify a vaccine from free text (already or not yet upper-cased).
pub fn identify(text: &str) -> Option<&'static Vaccine> {
    let upper = text.to_uppercase();
    VACCINE_CATALOG
        .iter()
        .find(|vaccine| vaccine.keywords.iter().any(|k| upper.contains(k)))
}

pub fn by_id(id: &str) -> Option<&'static Vaccine> {
    VACCINE_CATALOG.iter().find(|v| v.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_by_keyword() {
        assert_eq!(identify("vacuna influenza").unwrap().id, "INFLUVAC");
        assert_eq!(identify("GARDASIL 9").unwrap().id, "VPH");
        assert_eq!(identify("PREVENAR / NEUMOCOCO").unwrap().id, "NEUMO");
    }

    #[test]
    fn test_identify_unknown() {
        assert!(identify("VITAMINA C").is_none());
    }

    #[test]
    fn test_by_id() {
        assert_eq!(by_id("COVID").unwrap().display_name, "COVID-19");
        assert!(by_id("NOPE").is_none());
    }
}
