use std::path::PathBuf;

use chrono::NaiveDate;
use gwpm_catalog::{
    Catalog, CatalogError, ForecastRequest, Parameter, Source, resolve, resolve_member,
    resolve_target,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn catalog() -> Catalog {
    let gefs = Source::forecast(
        "GEFS",
        "/data/GEFS",
        "{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc",
    )
    .unwrap()
    .with_ensemble("01")
    .with_max_horizon(10)
    .with_variable("Temp", "air_temperature")
    .with_variable("P", "precipitation");

    let ifs = Source::forecast(
        "ECMWF_IFS",
        "/data/ECMWF_IFS_open_ensemble_forecasts",
        "{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc",
    )
    .unwrap()
    .with_ensemble("001")
    .with_run_hour(12)
    .with_variable("Temp", "air_temperature");

    let icon = Source::forecast(
        "ICON",
        "/data/ICON",
        "{base_path}/{parameter}/{date_time}/Daily/{file_name}.nc",
    )
    .unwrap()
    .with_max_horizon(7)
    .with_variable("Temp", "air_temperature");

    let era5 = Source::reference("ERA5", "/data/ERA5_HRES", "{base_path}/{parameter}/Daily/{file_name}.nc")
        .unwrap()
        .with_variable("Temp", "air_temperature");

    let mswep = Source::reference("MSWEP", "/data/MSWEP_V280", "{base_path}/NRT/Daily/{file_name}.nc")
        .unwrap()
        .with_variable("P", "precipitation");

    let clim = Source::climatology("CLIM", "/data/clim", "{base_path}/{parameter}/doy_{doy}.nc")
        .unwrap()
        .with_variable("Temp", "air_temperature");

    Catalog::new(
        vec![gefs, ifs, icon, era5, mswep, clim],
        vec![
            Parameter::new("Temp", "Temperature", "K", "ERA5"),
            Parameter::new("P", "Precipitation", "mm", "MSWEP"),
        ],
    )
    .unwrap()
}

#[test]
fn forecast_path_uses_issue_cycle_member_and_target_code() {
    let c = catalog();
    let r = resolve(&c, &ForecastRequest::new("GEFS", "Temp", date(2024, 8, 16), 1)).unwrap();
    assert_eq!(
        r.path,
        PathBuf::from("/data/GEFS/Temp/20240816_00/01/Daily/2024230.nc")
    );
    assert_eq!(r.variable, "air_temperature");
    assert_eq!(r.target, date(2024, 8, 17));
    assert_eq!(r.code.to_string(), "2024230");
}

#[test]
fn run_hour_and_three_digit_member() {
    let c = catalog();
    let r = resolve(&c, &ForecastRequest::new("ECMWF_IFS", "Temp", date(2024, 9, 17), 15)).unwrap();
    assert_eq!(
        r.path,
        PathBuf::from(
            "/data/ECMWF_IFS_open_ensemble_forecasts/Temp/20240917_12/001/Daily/2024276.nc"
        )
    );
}

#[test]
fn day_code_for_year_start_and_leap_year_end() {
    let c = catalog();
    let r = resolve(&c, &ForecastRequest::new("ICON", "Temp", date(2023, 12, 31), 1)).unwrap();
    assert!(r.path.ends_with("2024001.nc"));
    assert_eq!(r.code.ordinal(), 1);

    let r = resolve(&c, &ForecastRequest::new("GEFS", "Temp", date(2024, 12, 28), 3)).unwrap();
    assert_eq!(r.code.to_string(), "2024366");
    assert!(r.path.ends_with("2024366.nc"));
}

#[test]
fn reference_skips_issue_date() {
    let c = catalog();
    let r = resolve(&c, &ForecastRequest::new("ERA5", "Temp", date(2024, 8, 16), 5)).unwrap();
    assert_eq!(
        r.path,
        PathBuf::from("/data/ERA5_HRES/Temp/Daily/2024234.nc")
    );

    let r = resolve(&c, &ForecastRequest::new("MSWEP", "P", date(2024, 8, 16), 1)).unwrap();
    assert_eq!(r.path, PathBuf::from("/data/MSWEP_V280/NRT/Daily/2024230.nc"));
    assert_eq!(r.variable, "precipitation");
}

#[test]
fn climatology_uses_bare_ordinal() {
    let c = catalog();
    let clim = c.source("CLIM").unwrap();
    let r = resolve_target(clim, "Temp", date(2024, 2, 3)).unwrap();
    assert_eq!(r.path, PathBuf::from("/data/clim/Temp/doy_034.nc"));
}

#[test]
fn resolve_target_rejects_forecast() {
    let c = catalog();
    let gefs = c.source("GEFS").unwrap();
    assert!(matches!(
        resolve_target(gefs, "Temp", date(2024, 2, 3)),
        Err(CatalogError::WrongKind { .. })
    ));
}

#[test]
fn unsupported_parameter_is_configuration_error() {
    let c = catalog();
    let err = resolve(&c, &ForecastRequest::new("ICON", "P", date(2024, 8, 16), 1)).unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedParameter { .. }));
}

#[test]
fn horizon_bounds() {
    let c = catalog();
    let err = resolve(&c, &ForecastRequest::new("ICON", "Temp", date(2024, 8, 16), 8)).unwrap_err();
    assert_eq!(
        err,
        CatalogError::HorizonOutOfRange {
            source_id: "ICON".to_string(),
            horizon: 8,
            max: 7
        }
    );
    assert!(resolve(&c, &ForecastRequest::new("ICON", "Temp", date(2024, 8, 16), 0)).is_err());
    assert!(resolve(&c, &ForecastRequest::new("ICON", "Temp", date(2024, 8, 16), 7)).is_ok());
}

#[test]
fn unknown_ids() {
    let c = catalog();
    assert!(matches!(
        resolve(&c, &ForecastRequest::new("GFS", "Temp", date(2024, 8, 16), 1)),
        Err(CatalogError::UnknownSource { .. })
    ));
    assert!(matches!(
        resolve(&c, &ForecastRequest::new("GEFS", "Wind", date(2024, 8, 16), 1)),
        Err(CatalogError::UnknownParameter { .. })
    ));
}

#[test]
fn resolution_is_pure() {
    let c = catalog();
    let req = ForecastRequest::new("GEFS", "P", date(2024, 8, 20), 4);
    assert_eq!(resolve(&c, &req).unwrap(), resolve(&c, &req).unwrap());
}

#[test]
fn member_override_replaces_representative_member() {
    let c = catalog();
    let req = ForecastRequest::new("ECMWF_IFS", "Temp", date(2024, 9, 17), 1);
    let r = resolve_member(&c, &req, "007").unwrap();
    assert_eq!(
        r.path,
        PathBuf::from(
            "/data/ECMWF_IFS_open_ensemble_forecasts/Temp/20240917_12/007/Daily/2024262.nc"
        )
    );
    // The plain request still uses the configured member.
    assert!(resolve(&c, &req).unwrap().path.to_str().unwrap().contains("/001/"));
}

#[test]
fn member_override_needs_ensemble_slot_and_forecast() {
    let c = catalog();
    let icon = ForecastRequest::new("ICON", "Temp", date(2024, 8, 16), 1);
    assert_eq!(
        resolve_member(&c, &icon, "02").unwrap_err(),
        CatalogError::NoEnsembleSlot {
            source_id: "ICON".to_string()
        }
    );
    let era5 = ForecastRequest::new("ERA5", "Temp", date(2024, 8, 16), 1);
    assert!(matches!(
        resolve_member(&c, &era5, "02"),
        Err(CatalogError::WrongKind { .. })
    ));
    let late = ForecastRequest::new("GEFS", "Temp", date(2024, 8, 16), 11);
    assert!(matches!(
        resolve_member(&c, &late, "02"),
        Err(CatalogError::HorizonOutOfRange { .. })
    ));
}
