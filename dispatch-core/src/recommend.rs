use crate::incident::{Incident, UnitType};

pub fn recommended_units(incident: &Incident) -> Vec<UnitType> {
    let mut units = vec![UnitType::Police];
    if incident.fire || incident.gas {
        units.push(UnitType::Fire);
    }
    if incident.injuries {
        units.push(UnitType::Ambulance);
    }
    units
}

pub fn unit_service_name(unit: UnitType) -> &'static str {
    match unit {
        UnitType::Ambulance => "Ambulance",
        UnitType::Fire => "Fire Department",
        UnitType::Police => "Police",
    }
}

pub fn recommendation_label(incident: &Incident) -> String {
    recommended_units(incident)
        .into_iter()
        .map(unit_service_name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{CallerInfo, IncidentId};

    fn blank() -> Incident {
        Incident::placeholder(CallerInfo {
            id: IncidentId(1),
            name: String::new(),
            phone: String::new(),
            location: String::new(),
            latitude: None,
            longitude: None,
        })
    }

    #[test]
    fn police_is_always_recommended() {
        assert_eq!(recommended_units(&blank()), vec![UnitType::Police]);
        assert_eq!(recommendation_label(&blank()), "Police");
    }

    #[test]
    fn gas_leak_brings_fire_department() {
        let mut i = blank();
        i.gas = true;
        assert_eq!(recommended_units(&i), vec![UnitType::Police, UnitType::Fire]);
    }

    #[test]
    fn full_response_label() {
        let mut i = blank();
        i.fire = true;
        i.injuries = true;
        assert_eq!(
            recommendation_label(&i),
            "Police, Fire Department, Ambulance"
        );
    }
}
