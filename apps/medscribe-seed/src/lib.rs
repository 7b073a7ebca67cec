use clap::Parser;
use time::macros::date;
use tracing_subscriber::EnvFilter;

use medscribe_storage::{db::Db, models::NewPatient, patients};

#[derive(Debug, Parser)]
#[command(
	version = medscribe_cli::VERSION,
	rename_all = "kebab",
	styles = medscribe_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: medscribe_cli::ConfigArgs,
}

/// Applies the schema and inserts the demonstration patients that are not present yet.
pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = medscribe_config::load(&args.config.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let mut inserted = 0;

	for patient in demo_patients() {
		match patients::insert_patient_if_absent(&db, &patient).await? {
			Some(created) => {
				inserted += 1;

				tracing::info!(
					patient_code = %created.patient_code,
					name = %format!("{} {}", created.first_name, created.last_name),
					"Seeded patient."
				);
			},
			None => tracing::info!(
				name = %format!("{} {}", patient.first_name, patient.last_name),
				"Patient already present."
			),
		}
	}

	tracing::info!(inserted, "Database seeded.");
	db.close().await;

	Ok(())
}

pub fn demo_patients() -> Vec<NewPatient> {
	vec![
		demo_patient(
			"John",
			"Doe",
			date!(1985 - 03 - 15),
			"john.doe@email.com",
			"+1-555-0123",
			"123 Main St, Anytown, USA",
		),
		demo_patient(
			"Jane",
			"Smith",
			date!(1990 - 07 - 22),
			"jane.smith@email.com",
			"+1-555-0456",
			"456 Oak Ave, Somewhere, USA",
		),
		demo_patient(
			"Robert",
			"Johnson",
			date!(1978 - 11 - 08),
			"robert.johnson@email.com",
			"+1-555-0789",
			"789 Pine Rd, Elsewhere, USA",
		),
	]
}

fn demo_patient(
	first_name: &str,
	last_name: &str,
	date_of_birth: time::Date,
	email: &str,
	phone: &str,
	address: &str,
) -> NewPatient {
	NewPatient {
		first_name: first_name.to_string(),
		last_name: last_name.to_string(),
		date_of_birth,
		email: Some(email.to_string()),
		phone: Some(phone.to_string()),
		address: Some(address.to_string()),
	}
}
