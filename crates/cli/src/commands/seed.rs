//! Development seed data.
//!
//! Inserts a handful of unlinked donor profiles and one blood request so
//! the admin dashboard, search and matching pages have something to show.
//!
//! # Usage
//!
//! ```bash
//! bloodlink seed
//! ```

use bloodlink_core::BloodGroup;
use bloodlink_web::db::{BloodRequestRepository, DonorRepository, NewBloodRequest, NewDonor};

use super::{CommandError, connect};

/// Seed the database with sample data.
///
/// # Errors
///
/// Returns `CommandError::Database` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let donors = DonorRepository::new(&pool);
    let samples = [
        ("MD. Hossain", 25, BloodGroup::OPositive, "+8801700000001", "Mirpur, Dhaka"),
        ("Ayesha Siddiqua", 31, BloodGroup::APositive, "+8801700000002", "Uttara, Dhaka"),
        ("Rafiq Islam", 42, BloodGroup::BNegative, "+8801700000003", "Agrabad, Chattogram"),
        ("Nusrat Jahan", 28, BloodGroup::OPositive, "+8801700000004", "Khulna Sadar"),
        ("Tanvir Ahmed", 36, BloodGroup::AbPositive, "+8801700000005", "Sylhet Sadar"),
    ];

    for (name, age, blood_group, phone, address) in samples {
        let donor = donors
            .create(
                &NewDonor {
                    name: name.to_owned(),
                    age,
                    blood_group,
                    phone: phone.to_owned(),
                    address: address.to_owned(),
                },
                None,
            )
            .await
            .map_err(repository_to_command)?;
        tracing::info!("Seeded donor {} ({})", donor.name, donor.blood_group);
    }

    let request = BloodRequestRepository::new(&pool)
        .create(
            &NewBloodRequest {
                name: "A. Rahman".to_owned(),
                blood_group: BloodGroup::OPositive,
                phone: "+8801800000001".to_owned(),
                reason: "Urgent surgery".to_owned(),
                location: Some("Dhaka Medical College".to_owned()),
                message: String::new(),
                date_needed: None,
            },
            None,
        )
        .await
        .map_err(repository_to_command)?;
    tracing::info!("Seeded blood request for {}", request.name);

    tracing::info!("Seed complete");
    Ok(())
}

fn repository_to_command(e: bloodlink_web::db::RepositoryError) -> CommandError {
    use bloodlink_web::db::RepositoryError;
    match e {
        RepositoryError::Database(e) => CommandError::Database(e),
        other => CommandError::Invalid(other.to_string()),
    }
}
