pub mod export_xlsx;
pub mod import_xlsx;

pub use export_xlsx::export_workbook;
pub use import_xlsx::import_workbook;

/// The named source columns of the reference spreadsheet, in schema order.
/// These strings are the wire format: import matches headers against them and
/// export writes them back, so an exported file re-imports losslessly.
pub(crate) const MAPPED_HEADERS: [&str; 19] = [
    "Ilot",
    "Logement",
    "Décision",
    "Date Décision",
    "Nom de l'Affectaire",
    "Matricule",
    "NNI",
    "Profession",
    "Fonction",
    "Departement",
    "Téléphone",
    "En Activité",
    "A la Retraite",
    "Décédé",
    "Nom du repondant",
    "Lien de Parenté",
    "N° Téléphone",
    "Pour l'Etat",
    "Reformé",
];
