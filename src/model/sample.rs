//! Bundled sample invitation, shown when no data file is given

use std::sync::Arc;

use super::invitation::{
    EventSection, FontStyle, GalleryImage, GallerySection, HeroSection, InvitationData,
    MusicConfig, ThemeConfig,
};

fn image(id: &str, photo: &str, alt: &str, caption: Option<&str>) -> GalleryImage {
    GalleryImage {
        id: id.to_string(),
        url: format!("https://images.unsplash.com/photo-{photo}?w=800&q=80"),
        alt: alt.to_string(),
        caption: caption.map(str::to_string),
    }
}

impl InvitationData {
    pub fn sample() -> Self {
        Self {
            hero: HeroSection {
                title: "The Wedding of".to_string(),
                bride_name: "Sarah".to_string(),
                groom_name: "Michael".to_string(),
                date: "2024-12-15".to_string(),
                bg_image: "https://images.unsplash.com/photo-1519741497674-611481863552?w=1920&q=80"
                    .to_string(),
                subtitle: Some("Join us in celebrating our love".to_string()),
            },
            events: vec![
                EventSection {
                    id: "akad".to_string(),
                    title: "Akad Nikah".to_string(),
                    time: "09:00 WIB".to_string(),
                    location: "Masjid Al-Ikhlas".to_string(),
                    address: "Jl. Raya Bogor No. 123, Jakarta Selatan".to_string(),
                    map_link: "https://maps.google.com/?q=-6.2088,106.8456".to_string(),
                    description: Some("Upacara pernikahan sakral".to_string()),
                },
                EventSection {
                    id: "resepsi".to_string(),
                    title: "Resepsi Pernikahan".to_string(),
                    time: "12:00 - 15:00 WIB".to_string(),
                    location: "Balai Kartini".to_string(),
                    address: "Jl. Gatot Subroto No. 456, Jakarta Selatan".to_string(),
                    map_link: "https://maps.google.com/?q=-6.2115,106.8452".to_string(),
                    description: Some("Perayaan bersama keluarga dan sahabat".to_string()),
                },
            ],
            gallery: GallerySection {
                images: vec![
                    image("1", "1606800052052-a08af7148866", "Couple photo 1", Some("Our engagement day")),
                    image("2", "1583939003579-730e3918a45a", "Couple photo 2", Some("Pre-wedding photoshoot")),
                    image("3", "1511285560929-80b456fea0bc", "Couple photo 3", Some("Beautiful moments")),
                    image("4", "1591604466107-ec97de577aff", "Couple photo 4", None),
                    image("5", "1522673607200-164d1b6ce486", "Couple photo 5", None),
                    image("6", "1465495976277-4387d4b0b4c6", "Couple photo 6", None),
                ],
            },
            theme: ThemeConfig {
                primary_color: "#D4AF37".to_string(),
                secondary_color: "#8B7355".to_string(),
                accent_color: "#F5E6D3".to_string(),
                font_style: FontStyle::Elegant,
            },
            music: Some(Arc::new(MusicConfig {
                url: "/audio/wedding-song.mp3".to_string(),
                title: "Perfect".to_string(),
                artist: "Ed Sheeran".to_string(),
                autoplay: Some(false),
            })),
        }
    }
}
