pub mod shelter;

pub use shelter::{NewShelter, Shelter, ShelterPatch};
