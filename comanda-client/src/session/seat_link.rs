use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatLinkError {
    #[error("Invalid link: {0}")]
    InvalidUrl(String),

    #[error("Missing parameter: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {param}: {value}")]
    InvalidValue { param: &'static str, value: String },
}

/// Diner context carried by a seat's QR link
///
/// `https://host/menu?restaurante=3&mesa=12&silla=2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLink {
    pub restaurant_id: i64,
    pub table_id: i64,
    pub seat_id: Option<i64>,
}

impl SeatLink {
    pub fn parse(link: &str) -> Result<Self, SeatLinkError> {
        let url = Url::parse(link.trim()).map_err(|e| SeatLinkError::InvalidUrl(e.to_string()))?;

        let mut restaurant = None;
        let mut table = None;
        let mut seat = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "restaurante" => restaurant = Some(parse_id("restaurante", &value)?),
                "mesa" => table = Some(parse_id("mesa", &value)?),
                "silla" => seat = Some(parse_id("silla", &value)?),
                _ => {}
            }
        }

        Ok(Self {
            restaurant_id: restaurant.ok_or(SeatLinkError::Missing("restaurante"))?,
            table_id: table.ok_or(SeatLinkError::Missing("mesa"))?,
            seat_id: seat,
        })
    }
}

fn parse_id(param: &'static str, value: &str) -> Result<i64, SeatLinkError> {
    match value.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SeatLinkError::InvalidValue {
            param,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_link() {
        let link =
            SeatLink::parse("https://comanda.app/menu?restaurante=3&mesa=12&silla=2").unwrap();
        assert_eq!(
            link,
            SeatLink {
                restaurant_id: 3,
                table_id: 12,
                seat_id: Some(2),
            }
        );
    }

    #[test]
    fn test_seat_is_optional() {
        let link = SeatLink::parse("comanda://menu?mesa=4&restaurante=1&ref=qr").unwrap();
        assert_eq!(link.seat_id, None);
        assert_eq!(link.table_id, 4);
    }

    #[test]
    fn test_rejects_bad_links() {
        assert_eq!(
            SeatLink::parse("https://comanda.app/menu?mesa=4"),
            Err(SeatLinkError::Missing("restaurante"))
        );
        assert!(matches!(
            SeatLink::parse("https://comanda.app/menu?restaurante=x&mesa=4"),
            Err(SeatLinkError::InvalidValue {
                param: "restaurante",
                ..
            })
        ));
        assert!(matches!(
            SeatLink::parse("not a url"),
            Err(SeatLinkError::InvalidUrl(_))
        ));
    }
}
