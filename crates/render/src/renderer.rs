use crate::sheet::SpriteSheet;
use crate::surface::Surface;
use canvaswalk_common::{Color, EntityId, Rect};
use canvaswalk_kernel::{Entity, EntityStore};

/// How a drawable is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Flat colour over the destination rect.
    Color(Color),
    /// Copy `src` from the sprite sheet into the destination rect.
    Sprite { src: Rect },
}

/// An entity projected into surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: EntityId,
    pub dst: Rect,
    pub color: Color,
    pub fill: Fill,
}

impl Drawable {
    /// Destination from the entity's position; the source rect, when the entity
    /// has a sprite, takes the destination's size at the sprite offset for the
    /// entity's current facing (right when it has not moved).
    pub fn from_entity(entity: &Entity) -> Self {
        let origin = entity.position.origin();
        let (w, h) = (entity.position.width(), entity.position.height());
        let fill = match &entity.sprite {
            None => Fill::Color(entity.color.clone()),
            Some(sprite) => {
                let offset = sprite.offset_for(entity.facing().unwrap_or_default());
                Fill::Sprite {
                    src: Rect::new(offset.x, offset.y, w, h),
                }
            }
        };
        Self {
            id: entity.id.clone(),
            dst: Rect::new(origin.x, origin.y, w, h),
            color: entity.color.clone(),
            fill,
        }
    }
}

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// Clear `surface`, draw every entity in store order, then present.
///
/// Sprite entities are skipped (and logged) when the sheet is absent, still
/// loading, or does not contain their source rect.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    store: &EntityStore,
    sheet: Option<&SpriteSheet>,
) -> RenderStats {
    surface.clear();
    let mut stats = RenderStats::default();

    for drawable in store.iter().map(Drawable::from_entity) {
        match &drawable.fill {
            Fill::Color(color) => surface.fill_rect(color, drawable.dst),
            Fill::Sprite { src } => {
                let Some(sheet) = sheet.filter(|s| s.is_loaded()) else {
                    tracing::warn!(entity = %drawable.id, "sprite sheet not loaded, skipping");
                    stats.skipped += 1;
                    continue;
                };
                if !sheet.contains(src) {
                    tracing::warn!(
                        entity = %drawable.id,
                        sheet = %sheet.name,
                        ?src,
                        "sprite source outside sheet, skipping"
                    );
                    stats.skipped += 1;
                    continue;
                }
                surface.draw_image(sheet, *src, drawable.dst);
            }
        }
        stats.drawn += 1;
    }

    surface.present();
    tracing::trace!(drawn = stats.drawn, skipped = stats.skipped, "frame rendered");
    stats
}
