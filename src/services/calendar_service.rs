//! Calendario semanal y diario
//!
//! Agrupa las actividades de un rango de días en filas (una por conductor,
//! vehículo o sede) y celdas (una por día).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::dto::calendar_dto::{CalendarActivity, CalendarCell, CalendarGrouping, CalendarRow};
use crate::models::activity::{intervals_overlap, ActivityResourceRow, ActivityWithNames};

/// Etiqueta de la fila con las actividades sin recurso del tipo agrupado
pub const UNASSIGNED_LABEL: &str = "Sin asignar";

/// Actividad con las claves por las que puede agruparse
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    pub activity: CalendarActivity,
    pub site_id: Option<Uuid>,
    pub drivers: Vec<(Uuid, String)>,
    pub vehicles: Vec<(Uuid, String)>,
}

impl CalendarEntry {
    fn keys(&self, grouping: CalendarGrouping) -> Vec<(Uuid, String)> {
        match grouping {
            CalendarGrouping::Driver => self.drivers.clone(),
            CalendarGrouping::Vehicle => self.vehicles.clone(),
            CalendarGrouping::Site => match (self.site_id, &self.activity.site_name) {
                (Some(id), Some(name)) => vec![(id, name.clone())],
                _ => Vec::new(),
            },
        }
    }
}

/// Unir actividades y recursos en entradas de calendario
pub fn build_entries(activities: Vec<ActivityWithNames>, rows: &[ActivityResourceRow]) -> Vec<CalendarEntry> {
    let mut by_activity: HashMap<Uuid, Vec<&ActivityResourceRow>> = HashMap::new();
    for row in rows {
        by_activity.entry(row.activity_id).or_default().push(row);
    }

    activities
        .into_iter()
        .map(|activity| {
            let resources = by_activity.remove(&activity.id).unwrap_or_default();
            let drivers: Vec<(Uuid, String)> = resources
                .iter()
                .filter_map(|r| r.driver_id.zip(r.driver_label()))
                .collect();
            let vehicles: Vec<(Uuid, String)> = resources
                .iter()
                .filter_map(|r| r.vehicle_id.zip(r.vehicle_label()))
                .collect();

            CalendarEntry {
                site_id: activity.site_id,
                activity: CalendarActivity {
                    id: activity.id,
                    title: activity.title,
                    client_name: activity.client_name,
                    site_name: activity.site_name,
                    start_at: activity.start_at,
                    end_at: activity.end_at,
                    status: activity.status,
                    drivers: drivers.iter().map(|(_, label)| label.clone()).collect(),
                    vehicles: vehicles.iter().map(|(_, label)| label.clone()).collect(),
                },
                drivers,
                vehicles,
            }
        })
        .collect()
}

/// Lunes y domingo de la semana que contiene `date`; `None` en los
/// extremos del calendario
pub fn week_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let monday = date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))?;
    let sunday = monday.checked_add_days(Days::new(6))?;
    Some((monday, sunday))
}

/// Días entre `start` y `end`, ambos incluidos
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .collect()
}

/// Instante UTC de inicio de un día
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Intervalo `[inicio del primer día, inicio del día siguiente al último)`
pub fn range_bounds(start: NaiveDate, end: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((day_start(start), day_start(end.succ_opt()?)))
}

fn cells_for(days: &[NaiveDate], entries: &[&CalendarEntry]) -> Vec<CalendarCell> {
    days.iter()
        .map(|day| {
            let from = day_start(*day);
            let to = day.succ_opt().map(day_start).unwrap_or(DateTime::<Utc>::MAX_UTC);
            let mut activities: Vec<CalendarActivity> = entries
                .iter()
                .filter(|e| intervals_overlap(e.activity.start_at, e.activity.end_at, from, to))
                .map(|e| e.activity.clone())
                .collect();
            activities.sort_by_key(|a| (a.start_at, a.id));
            CalendarCell { date: *day, activities }
        })
        .collect()
}

/// Construir las filas del calendario
///
/// Una actividad con varios recursos del tipo agrupado aparece en cada
/// fila; las que no tienen ninguno van a una última fila sin clave. Las
/// filas se ordenan por etiqueta.
pub fn build_rows(
    days: &[NaiveDate],
    grouping: CalendarGrouping,
    entries: &[CalendarEntry],
) -> Vec<CalendarRow> {
    let mut labels: HashMap<Uuid, String> = HashMap::new();
    let mut grouped: BTreeMap<Uuid, Vec<&CalendarEntry>> = BTreeMap::new();
    let mut unassigned: Vec<&CalendarEntry> = Vec::new();

    for entry in entries {
        let mut keys = entry.keys(grouping);
        keys.sort_by_key(|(id, _)| *id);
        keys.dedup_by_key(|(id, _)| *id);

        if keys.is_empty() {
            unassigned.push(entry);
            continue;
        }
        for (id, label) in keys {
            labels.entry(id).or_insert(label);
            grouped.entry(id).or_default().push(entry);
        }
    }

    let mut rows: Vec<CalendarRow> = grouped
        .into_iter()
        .map(|(id, list)| CalendarRow {
            key: Some(id),
            label: labels.remove(&id).unwrap_or_default(),
            cells: cells_for(days, &list),
        })
        .collect();
    rows.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()).then(a.key.cmp(&b.key)));

    if !unassigned.is_empty() {
        rows.push(CalendarRow {
            key: None,
            label: UNASSIGNED_LABEL.to_string(),
            cells: cells_for(days, &unassigned),
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityStatus;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, hour, 0, 0).unwrap()
    }

    fn entry(title: &str, start: DateTime<Utc>, end: DateTime<Utc>, drivers: Vec<(Uuid, &str)>) -> CalendarEntry {
        CalendarEntry {
            activity: CalendarActivity {
                id: Uuid::new_v4(),
                title: title.to_string(),
                client_name: "Edil Nord".to_string(),
                site_name: None,
                start_at: start,
                end_at: end,
                status: ActivityStatus::Planned,
                drivers: drivers.iter().map(|(_, l)| l.to_string()).collect(),
                vehicles: Vec::new(),
            },
            site_id: None,
            drivers: drivers.into_iter().map(|(id, l)| (id, l.to_string())).collect(),
            vehicles: Vec::new(),
        }
    }

    #[test]
    fn test_week_bounds() {
        // 2025-03-12 es miércoles
        assert_eq!(week_bounds(date(12)), Some((date(10), date(16))));
        assert_eq!(week_bounds(date(10)), Some((date(10), date(16))));
        assert_eq!(week_bounds(date(16)), Some((date(10), date(16))));
    }

    #[test]
    fn test_days_between() {
        let days = days_between(date(10), date(16));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(10));
        assert_eq!(days[6], date(16));
        assert_eq!(days_between(date(10), date(10)), vec![date(10)]);
    }

    #[test]
    fn test_rows_sorted_and_unassigned_last() {
        let mario = Uuid::new_v4();
        let anna = Uuid::new_v4();
        let entries = vec![
            entry("Scavo", at(11, 8), at(11, 12), vec![(mario, "Mario Rossi")]),
            entry("Getto", at(12, 8), at(12, 10), vec![(anna, "Anna Verdi"), (mario, "Mario Rossi")]),
            entry("Sopralluogo", at(13, 9), at(13, 10), vec![]),
        ];

        let days = days_between(date(10), date(16));
        let rows = build_rows(&days, CalendarGrouping::Driver, &entries);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Anna Verdi");
        assert_eq!(rows[1].label, "Mario Rossi");
        assert_eq!(rows[2].key, None);
        assert_eq!(rows[2].label, UNASSIGNED_LABEL);

        // Mario: lunes vacío, martes Scavo, miércoles Getto
        assert!(rows[1].cells[0].activities.is_empty());
        assert_eq!(rows[1].cells[1].activities[0].title, "Scavo");
        assert_eq!(rows[1].cells[2].activities[0].title, "Getto");
        assert_eq!(rows[0].cells[2].activities[0].title, "Getto");
    }

    #[test]
    fn test_multi_day_activity_in_each_cell() {
        let driver = Uuid::new_v4();
        let entries = vec![entry("Trasferta", at(11, 18), at(13, 8), vec![(driver, "Luca Bianchi")])];
        let days = days_between(date(10), date(16));
        let rows = build_rows(&days, CalendarGrouping::Driver, &entries);

        let filled: Vec<NaiveDate> = rows[0]
            .cells
            .iter()
            .filter(|c| !c.activities.is_empty())
            .map(|c| c.date)
            .collect();
        assert_eq!(filled, vec![date(11), date(12), date(13)]);
    }

    #[test]
    fn test_activity_ending_at_midnight_stays_on_its_day() {
        let driver = Uuid::new_v4();
        let entries = vec![entry("Notturno", at(11, 20), at(12, 0), vec![(driver, "Luca Bianchi")])];
        let rows = build_rows(&days_between(date(11), date(12)), CalendarGrouping::Driver, &entries);
        assert_eq!(rows[0].cells[0].activities.len(), 1);
        assert!(rows[0].cells[1].activities.is_empty());
    }

    #[test]
    fn test_cells_sorted_by_start() {
        let driver = Uuid::new_v4();
        let entries = vec![
            entry("Pomeriggio", at(11, 14), at(11, 16), vec![(driver, "Luca Bianchi")]),
            entry("Mattina", at(11, 8), at(11, 10), vec![(driver, "Luca Bianchi")]),
        ];
        let rows = build_rows(&[date(11)], CalendarGrouping::Driver, &entries);
        let titles: Vec<&str> = rows[0].cells[0].activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Mattina", "Pomeriggio"]);
    }

    #[test]
    fn test_group_by_site() {
        let site = Uuid::new_v4();
        let mut with_site = entry("Cantiere A", at(11, 8), at(11, 12), vec![]);
        with_site.site_id = Some(site);
        with_site.activity.site_name = Some("Cantiere Bicocca".to_string());
        let without_site = entry("Ufficio", at(11, 8), at(11, 12), vec![]);

        let rows = build_rows(&[date(11)], CalendarGrouping::Site, &[with_site, without_site]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, Some(site));
        assert_eq!(rows[0].label, "Cantiere Bicocca");
        assert_eq!(rows[1].key, None);
    }

    #[test]
    fn test_range_bounds() {
        let (from, to) = range_bounds(date(10), date(16)).unwrap();
        assert_eq!(from, at(10, 0));
        assert_eq!(to, at(17, 0));
    }

    #[test]
    fn test_bounds_at_calendar_edges() {
        assert!(range_bounds(NaiveDate::MAX, NaiveDate::MAX).is_none());
        assert!(range_bounds(NaiveDate::MIN, NaiveDate::MIN).is_some());

        // La semana de MIN empieza antes de MIN salvo que MIN sea lunes
        let min_is_monday = NaiveDate::MIN.weekday().num_days_from_monday() == 0;
        assert_eq!(week_bounds(NaiveDate::MIN).is_some(), min_is_monday);
    }

    #[test]
    fn test_build_entries_attaches_resource_labels() {
        let id = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let vehicle = Uuid::new_v4();
        let activity = ActivityWithNames {
            id,
            client_id: Uuid::new_v4(),
            client_name: "Cliente".into(),
            site_id: None,
            site_name: None,
            title: "Noleggio gru".into(),
            description: None,
            start_at: at(10, 8),
            end_at: at(10, 12),
            status: ActivityStatus::Planned,
            completed_at: None,
            notes: None,
            created_by: None,
            created_at: at(1, 8),
            updated_at: at(1, 8),
        };
        let row = ActivityResourceRow {
            id: Uuid::new_v4(),
            activity_id: id,
            driver_id: Some(driver),
            driver_first_name: Some("Luca".into()),
            driver_last_name: Some("Bianchi".into()),
            vehicle_id: Some(vehicle),
            vehicle_plate: Some("AB123CD".into()),
            vehicle_brand: None,
            vehicle_model: None,
        };

        let entries = build_entries(vec![activity], &[row]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].drivers, vec![(driver, "Luca Bianchi".to_string())]);
        assert_eq!(entries[0].vehicles, vec![(vehicle, "AB123CD".to_string())]);
        assert_eq!(entries[0].activity.drivers, vec!["Luca Bianchi".to_string()]);
    }
}
