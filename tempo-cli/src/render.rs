//! Text cards for each screen's ready state.

use tempo_core::{
    DayPeriod, ForecastDay, HistoricalDay, Municipality, WeatherSnapshot, icon_url,
};

const NO_HISTORY: &str = "Nenhum dado histórico para o período.";

pub fn snapshot(s: &WeatherSnapshot, icon_base: &str) -> String {
    let period = match s.period {
        DayPeriod::Day => "dia",
        DayPeriod::Night => "noite",
    };

    let mut lines = vec![
        s.city.clone(),
        format!("{}°C ({period})", s.temperature),
        s.description.clone(),
        format!("Ícone: {}", icon_url(icon_base, &s.condition_slug)),
        format!("Umidade: {}%", s.humidity),
        format!("Vento: {}", s.wind_speed),
        format!("Amanhecer: {}", s.sunrise),
        format!("Pôr do Sol: {}", s.sunset),
    ];
    if let Some(today) = s.today() {
        lines.push(format!("Máx: {}°C  Mín: {}°C", today.max, today.min));
    }
    card(lines)
}

pub fn forecast(city: &str, days: &[ForecastDay]) -> String {
    let mut lines = vec![format!("Previsão estendida - {city}")];
    for day in days {
        lines.extend([
            format!("{} - {}", day.date, day.weekday),
            format!("  {}", day.description),
            format!("  Máx: {}°C  Mín: {}°C", day.max, day.min),
            format!("  Umidade: {}%", day.humidity),
            format!("  Probabilidade de chuva: {}%", day.rain_probability),
            format!("  Vento: {}", day.wind_speed),
        ]);
    }
    card(lines)
}

pub fn history(city: &str, days: &[HistoricalDay]) -> String {
    let mut lines = vec![format!("Histórico - {city}")];
    if days.is_empty() {
        lines.push(NO_HISTORY.to_string());
    }
    for day in days {
        let t = &day.temperature;
        lines.extend([
            day.date.clone(),
            format!("  Máx: {}°C  Mín: {}°C  Média: {}°C", t.max, t.min, t.avg),
            format!("  Umidade Média: {}%", day.humidity_avg),
            format!("  Velocidade do Vento Média: {} km/h", day.wind_speed_avg),
            format!("  Nebulosidade Média: {}%", day.cloudiness_avg),
        ]);
    }
    card(lines)
}

pub fn suggestions(list: &[Municipality]) -> String {
    card(list.iter().map(Municipality::label).collect())
}

/// One line per entry, each newline-terminated.
fn card(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::model::Aggregate;

    fn recife() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Recife, PE".into(),
            temperature: 27,
            description: "Parcialmente nublado".into(),
            humidity: 74,
            wind_speed: "5.66 km/h".into(),
            sunrise: "05:12 am".into(),
            sunset: "05:36 pm".into(),
            condition_slug: "cloudly_day".into(),
            period: DayPeriod::Day,
            forecast: vec![ForecastDay {
                date: "16/10".into(),
                weekday: "Qua".into(),
                max: 30,
                min: 22,
                humidity: 70,
                rain_probability: 20,
                wind_speed: "4.1 km/h".into(),
                description: "Tempo nublado".into(),
                condition: "cloud".into(),
            }],
        }
    }

    #[test]
    fn snapshot_card_shows_all_fields() {
        let card = snapshot(&recife(), "https://icons.test");

        assert!(card.starts_with("Recife, PE\n27°C (dia)\n"));
        assert!(card.contains("Ícone: https://icons.test/cloudly_day.svg"));
        assert!(card.contains("Umidade: 74%"));
        assert!(card.contains("Pôr do Sol: 05:36 pm"));
        assert!(card.contains("Máx: 30°C  Mín: 22°C"));
    }

    #[test]
    fn forecast_card_lists_each_day() {
        let card = forecast("Recife", &recife().forecast);

        assert!(card.starts_with("Previsão estendida - Recife\n16/10 - Qua\n"));
        assert!(card.contains("\n  Máx: 30°C  Mín: 22°C\n"));
        assert!(card.contains("Probabilidade de chuva: 20%"));
    }

    #[test]
    fn history_card_handles_empty_and_filled() {
        assert_eq!(
            history("Recife", &[]),
            "Histórico - Recife\nNenhum dado histórico para o período.\n"
        );

        let day = HistoricalDay {
            date: "2024-01-01".into(),
            temperature: Aggregate {
                max: 30.5,
                min: 22.0,
                avg: 26.25,
            },
            humidity_avg: 75.0,
            wind_speed_avg: 10.2,
            cloudiness_avg: 45.0,
        };
        let card = history("Recife", &[day]);
        assert!(card.starts_with("Histórico - Recife\n2024-01-01\n"));
        assert!(card.contains("Máx: 30.5°C  Mín: 22°C  Média: 26.25°C"));
        assert!(card.contains("Velocidade do Vento Média: 10.2 km/h"));
    }

    #[test]
    fn suggestions_one_per_line() {
        let list = vec![
            Municipality::new("Recife", Some("PE")),
            Municipality::new("Recreio", None),
        ];
        assert_eq!(suggestions(&list), "Recife - PE\nRecreio\n");
    }
}
