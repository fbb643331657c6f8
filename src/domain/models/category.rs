use serde::Serialize;
use crate::domain::models::procedure::Procedure;

/// Section used for procedure types missing from [`PROCEDURE_TYPES`].
pub const FALLBACK_SECTION: &str = "Други";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
    pub main: &'static str,
    pub sub: Option<&'static str>,
}

/// Known procedure types in display order, with the section each belongs to.
pub const PROCEDURE_TYPES: &[(&str, SectionInfo)] = &[
    ("Нокти", SectionInfo { main: "Нокти", sub: None }),
    ("Вежди", SectionInfo { main: "Лице", sub: None }),
    ("Мигли", SectionInfo { main: "Лице", sub: None }),
    ("Терапии за лице", SectionInfo { main: "Лице", sub: None }),
    ("Естетични процедури - лице", SectionInfo { main: "Лице", sub: None }),
    ("Лазерна епилация - жени", SectionInfo { main: "Епилация", sub: Some("Епилация жени") }),
    ("Кола маска - жени", SectionInfo { main: "Епилация", sub: Some("Епилация жени") }),
    ("Лазерна епилация - мъже", SectionInfo { main: "Епилация", sub: Some("Епилация мъже") }),
    ("Кола маска - мъже", SectionInfo { main: "Епилация", sub: Some("Епилация мъже") }),
    ("Естетични процедури - тяло", SectionInfo { main: "Тяло", sub: None }),
    ("Пилинг на тяло", SectionInfo { main: "Тяло", sub: None }),
    ("Пресотерапия и лимфендренаж", SectionInfo { main: "Тяло", sub: None }),
];

pub fn section_for(procedure_type: &str) -> SectionInfo {
    PROCEDURE_TYPES
        .iter()
        .find(|(name, _)| *name == procedure_type)
        .map(|(_, info)| *info)
        .unwrap_or(SectionInfo { main: FALLBACK_SECTION, sub: None })
}

fn type_rank(procedure_type: &str) -> usize {
    PROCEDURE_TYPES
        .iter()
        .position(|(name, _)| *name == procedure_type)
        .unwrap_or(PROCEDURE_TYPES.len())
}

#[derive(Debug, Serialize)]
pub struct CatalogGroup {
    #[serde(rename = "type")]
    pub procedure_type: String,
    pub procedures: Vec<Procedure>,
}

#[derive(Debug, Serialize)]
pub struct CatalogSection {
    pub main: String,
    pub sub: Option<String>,
    pub groups: Vec<CatalogGroup>,
}

/// Groups procedures by type, then types into sections, both in display order.
/// Unknown types sort after the known ones, alphabetically.
pub fn build_catalog(procedures: Vec<Procedure>) -> Vec<CatalogSection> {
    let mut procedures = procedures;
    procedures.sort_by(|a, b| {
        type_rank(&a.procedure_type)
            .cmp(&type_rank(&b.procedure_type))
            .then_with(|| a.procedure_type.cmp(&b.procedure_type))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut sections: Vec<CatalogSection> = Vec::new();
    for procedure in procedures {
        let info = section_for(&procedure.procedure_type);

        let section = match sections
            .iter()
            .position(|s| s.main == info.main && s.sub.as_deref() == info.sub)
        {
            Some(idx) => &mut sections[idx],
            None => {
                sections.push(CatalogSection {
                    main: info.main.to_string(),
                    sub: info.sub.map(str::to_string),
                    groups: Vec::new(),
                });
                let last = sections.len() - 1;
                &mut sections[last]
            }
        };

        match section.groups.iter_mut().find(|g| g.procedure_type == procedure.procedure_type) {
            Some(group) => group.procedures.push(procedure),
            None => section.groups.push(CatalogGroup {
                procedure_type: procedure.procedure_type.clone(),
                procedures: vec![procedure],
            }),
        }
    }
    sections
}
