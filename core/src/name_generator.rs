//! Deterministic policyholder names and vehicles for demo data.

use crate::rng::SeededRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut SeededRng) -> String {
        format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES))
    }

    /// A (make, model) pair from the catalogue.
    pub fn vehicle(rng: &mut SeededRng) -> (&'static str, &'static str) {
        let (make, models) = *rng.pick(VEHICLES);
        (make, *rng.pick(models))
    }

    /// 17-character VIN-shaped identifier (no I, O or Q).
    pub fn vin(rng: &mut SeededRng) -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";
        (0..17).map(|_| *rng.pick(ALPHABET) as char).collect()
    }
}

const FIRST_NAMES: &[&str] = &[
    "Ana", "Carlos", "Lucia", "Jorge", "Sofia", "Diego", "Valeria", "Mateo", "Camila",
    "Andres", "Paula", "Miguel", "Daniela", "Javier", "Isabel", "Ricardo", "Elena",
    "Fernando", "Gabriela", "Hector", "Laura", "Oscar", "Mariana", "Pablo", "Natalia",
    "Rafael", "Teresa", "Victor", "Adriana", "Emilio",
];

const LAST_NAMES: &[&str] = &[
    "Benitez", "Gimenez", "Gonzalez", "Rodriguez", "Martinez", "Lopez", "Fernandez",
    "Ramirez", "Acosta", "Duarte", "Ortiz", "Villalba", "Cabrera", "Sanabria", "Rojas",
    "Aquino", "Romero", "Franco", "Vera", "Cardozo", "Ayala", "Nunez", "Caceres", "Medina",
];

const VEHICLES: &[(&str, &[&str])] = &[
    ("Toyota", &["Corolla", "Hilux", "RAV4", "Yaris"]),
    ("Volkswagen", &["Gol", "Amarok", "Polo"]),
    ("Chevrolet", &["Onix", "S10", "Cruze"]),
    ("Hyundai", &["Tucson", "HB20", "Creta"]),
    ("Kia", &["Picanto", "Sportage", "Rio"]),
    ("Nissan", &["Frontier", "Versa", "Kicks"]),
    ("Ford", &["Ranger", "Ka", "EcoSport"]),
];
