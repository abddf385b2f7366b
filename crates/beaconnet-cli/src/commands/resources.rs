//! Resource catalog listing.

use anyhow::Result;

use beaconnet_lib::{ResourceCatalog, Universe};

/// Handle the `resources` subcommand.
pub fn handle_list_resources(universe: &Universe) -> Result<()> {
    print_catalog(universe.catalog(), universe);
    Ok(())
}

fn print_catalog(catalog: &ResourceCatalog, universe: &Universe) {
    let resources = catalog.resources_sorted();
    if resources.is_empty() {
        println!("No resources in catalog.");
        return;
    }

    match catalog.source_path() {
        Some(path) => println!("Resources ({}) from {}:", resources.len(), path.display()),
        None => println!("Resources ({}):", resources.len()),
    }
    println!("{:<20} {:>14} {:<}", "Name", "Tonnes/Unit", "Role");
    for resource in resources {
        let role = if resource.name == universe.config.fuel_resource {
            "fuel"
        } else if resource.name == universe.config.charge_resource {
            "charge"
        } else if universe.config.is_hazardous_resource(&resource.name) {
            "hazardous"
        } else {
            ""
        };
        println!("{:<20} {:>14.4} {}", resource.name, resource.density, role);
    }
}
