//! Contract scenarios for the pet-store API.
//!
//! Every function takes the store's base URL (e.g.
//! `https://petstore.swagger.io/v2`) and returns a ready-to-run scenario.
//! Outcomes the public store does not pin down (whether a given id exists,
//! whether a delete found its target) are declared as status sets rather
//! than guessed.

use covenant_application::{Scenario, ScenarioStep};
use covenant_domain::{ExpectationSet, RequestBuilder};
use serde_json::json;

use crate::model::{Pet, PetStatus};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Id used by the create and update scenarios.
pub const TEST_PET_ID: i64 = 9999;
/// Id used by the create/delete/verify lifecycle.
pub const LIFECYCLE_PET_ID: i64 = 88888;

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn send_pet(builder: RequestBuilder, pet: &Pet) -> RequestBuilder {
    builder
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .json(&pet.to_json())
}

fn single(name: &str, request: RequestBuilder, expectations: ExpectationSet) -> Scenario {
    Scenario::new(name).step(ScenarioStep::request(name, request, expectations))
}

/// Creating a pet echoes it back.
pub fn create_pet(base_url: &str) -> Scenario {
    let pet = Pet::new("TestPet", PetStatus::Available).with_id(TEST_PET_ID);
    single(
        "create pet",
        send_pet(RequestBuilder::post(endpoint(base_url, "/pet")), &pet),
        ExpectationSet::new().status(200).json_like(pet.to_json()),
    )
}

/// Creating a pet without an id is accepted; the store assigns one.
pub fn create_pet_without_id(base_url: &str) -> Scenario {
    let pet = Pet::new("InvalidPet", PetStatus::Available);
    single(
        "create pet without id",
        send_pet(RequestBuilder::post(endpoint(base_url, "/pet")), &pet),
        ExpectationSet::new().status(200).json_like(pet.to_json()),
    )
}

/// Fetching a well-known id either finds it or reports it missing.
pub fn get_pet_by_id(base_url: &str) -> Scenario {
    single(
        "get pet by id",
        RequestBuilder::get(endpoint(base_url, "/pet/1")),
        ExpectationSet::new().status_one_of([200, 404]),
    )
}

/// A non-numeric id is not found.
pub fn get_pet_by_invalid_id(base_url: &str) -> Scenario {
    single(
        "get pet by invalid id",
        RequestBuilder::get(endpoint(base_url, "/pet/invalid-id")),
        ExpectationSet::new().status(404),
    )
}

/// Every pet listed for a status carries that status.
pub fn find_by_status(base_url: &str) -> Scenario {
    single(
        "find pets by status",
        RequestBuilder::get(endpoint(base_url, "/pet/findByStatus"))
            .query("status", PetStatus::Available.as_str()),
        ExpectationSet::new()
            .status(200)
            .json_like(json!([{"status": "available"}])),
    )
}

/// An unknown status yields an empty list, not an error.
pub fn find_by_unknown_status(base_url: &str) -> Scenario {
    single(
        "find pets by unknown status",
        RequestBuilder::get(endpoint(base_url, "/pet/findByStatus")).query("status", "banana"),
        ExpectationSet::new().status(200).json(json!([])),
    )
}

/// Updating a pet echoes the new name.
pub fn update_pet(base_url: &str) -> Scenario {
    let pet = Pet::new("UpdatedPet", PetStatus::Available).with_id(TEST_PET_ID);
    single(
        "update pet",
        send_pet(RequestBuilder::put(endpoint(base_url, "/pet")), &pet),
        ExpectationSet::new()
            .status(200)
            .json_like(json!({"name": "UpdatedPet"})),
    )
}

/// Updating an unknown pet upserts it.
pub fn update_missing_pet(base_url: &str) -> Scenario {
    let pet = Pet::new("NonExistentPet", PetStatus::Sold).with_id(123_456);
    single(
        "update missing pet",
        send_pet(RequestBuilder::put(endpoint(base_url, "/pet")), &pet),
        ExpectationSet::new()
            .status(200)
            .json_like(json!({"name": "NonExistentPet", "status": "sold"})),
    )
}

/// Deleting an id that may not exist.
pub fn delete_missing_pet(base_url: &str) -> Scenario {
    single(
        "delete missing pet",
        RequestBuilder::delete(endpoint(base_url, "/pet/999999")),
        ExpectationSet::new().status_one_of([200, 404]),
    )
}

/// Creates a pet, deletes it by the id the store returned, then checks it.
///
/// The final lookup accepts 200 as well as 404: the public store is
/// eventually consistent and may still serve a deleted pet.
pub fn pet_lifecycle(base_url: &str) -> Scenario {
    let pet = Pet::new("TempPet", PetStatus::Pending).with_id(LIFECYCLE_PET_ID);
    let delete_base = base_url.to_string();
    let verify_base = base_url.to_string();

    Scenario::new("pet lifecycle")
        .step(
            ScenarioStep::request(
                "create",
                send_pet(RequestBuilder::post(endpoint(base_url, "/pet")), &pet),
                ExpectationSet::new().status(200),
            )
            .capture_json("pet_id", "/id"),
        )
        .step(ScenarioStep::new(
            "delete",
            move |state| {
                let id = state.require_i64("pet_id")?;
                RequestBuilder::delete(endpoint(&delete_base, &format!("/pet/{id}"))).build()
            },
            ExpectationSet::new().status_one_of([200, 404]),
        ))
        .step(ScenarioStep::new(
            "verify deleted",
            move |state| {
                let id = state.require_i64("pet_id")?;
                RequestBuilder::get(endpoint(&verify_base, &format!("/pet/{id}"))).build()
            },
            ExpectationSet::new().status_one_of([404, 200]),
        ))
}

/// The full suite, in declaration order.
pub fn all(base_url: &str) -> Vec<Scenario> {
    vec![
        create_pet(base_url),
        create_pet_without_id(base_url),
        get_pet_by_id(base_url),
        get_pet_by_invalid_id(base_url),
        find_by_status(base_url),
        find_by_unknown_status(base_url),
        update_pet(base_url),
        update_missing_pet(base_url),
        delete_missing_pet(base_url),
        pet_lifecycle(base_url),
    ]
}
