//! Display names for technical measurement identifiers

/// Common automotive abbreviations. Order matters: the first partial match
/// wins.
const NAME_MAPPINGS: &[(&str, &str)] = &[
    ("n_tcha", "TurboSpeed"),
    ("n_mot", "EngineRPM"),
    ("n_eng", "EngineRPM"),
    ("rpm", "EngineRPM"),
    ("p_map", "ManifoldPressure"),
    ("p_boost", "BoostPressure"),
    ("p_rail", "FuelRailPressure"),
    ("t_air", "IntakeAirTemp"),
    ("t_cool", "CoolantTemp"),
    ("t_oil", "OilTemp"),
    ("t_exh", "ExhaustTemp"),
    ("lambda", "AirFuelRatio"),
    ("afr", "AirFuelRatio"),
    ("maf", "MassAirFlow"),
    ("map", "ManifoldPressure"),
    ("tps", "ThrottlePosition"),
    ("ign_adv", "IgnitionAdvance"),
    ("timing", "IgnitionTiming"),
    ("inj_time", "InjectorPulseWidth"),
    ("fuel_flow", "FuelFlow"),
    ("boost", "BoostPressure"),
    ("vvt", "VariableValveTiming"),
    ("knock", "KnockSensor"),
    ("o2", "OxygenSensor"),
    ("egt", "ExhaustGasTemp"),
    ("baro", "BarometricPressure"),
    ("vss", "VehicleSpeed"),
    ("gear", "GearPosition"),
    ("clutch", "ClutchPosition"),
    ("brake", "BrakePressure"),
    ("acc_ped", "AcceleratorPedal"),
    ("turbo", "TurbochargerSpeed"),
    ("wastegate", "WastegatePosition"),
    ("intercooler", "IntercoolerTemp"),
    ("dpf", "DieselParticulateFilter"),
    ("egr", "ExhaustGasRecirculation"),
];

/// Map a measurement identifier to a readable name.
///
/// Exact table matches win, then the first table key that contains or is
/// contained in the lower-cased identifier. Anything else gets underscores
/// replaced by spaces and each word capitalized.
pub fn humanize(token: &str) -> String {
    let lower = token.to_lowercase();

    if let Some((_, readable)) = NAME_MAPPINGS.iter().find(|(key, _)| *key == lower) {
        return readable.to_string();
    }

    if let Some((_, readable)) = NAME_MAPPINGS
        .iter()
        .find(|(key, _)| lower.contains(key) || key.contains(lower.as_str()))
    {
        return readable.to_string();
    }

    title_case(&token.replace('_', " "))
}

/// Upper-case the first letter of each run of letters, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(humanize("n_tcha"), "TurboSpeed");
        assert_eq!(humanize("N_TCHA"), "TurboSpeed");
        assert_eq!(humanize("lambda"), "AirFuelRatio");
    }

    #[test]
    fn test_partial_match() {
        assert_eq!(humanize("my_rpm_sensor"), "EngineRPM");
        // Token contained in a key
        assert_eq!(humanize("tcha"), "TurboSpeed");
        // "p_map" precedes "map" in the table
        assert_eq!(humanize("p_map_raw"), "ManifoldPressure");
        // First key in table order wins, not the longest
        assert_eq!(humanize("boost_turbo"), "BoostPressure");
    }

    #[test]
    fn test_fallback_title_case() {
        assert_eq!(humanize("xyz_custom"), "Xyz Custom");
        assert_eq!(humanize("SOME_VALUE"), "Some Value");
        assert_eq!(humanize("abc2def"), "Abc2Def");
    }
}
