use crate::domain::model::{Category, ShapedItem, ShapedStock, StockItem, StockSnapshot};

/// Where an item's image URL comes from. Only one source is consulted per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// The item's own `image` field.
    ItemField,
    /// The payload's `imageData` name to URL table.
    SideTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOptions {
    pub image_source: ImageSource,
    pub keep_value: bool,
}

impl ShapeOptions {
    /// `{name, value, image}` with images from the items themselves.
    pub const ACTIVE: ShapeOptions = ShapeOptions {
        image_source: ImageSource::ItemField,
        keep_value: true,
    };

    /// `{name, image}` with images looked up in `imageData`.
    pub const SUMMARY: ShapeOptions = ShapeOptions {
        image_source: ImageSource::SideTable,
        keep_value: false,
    };
}

/// Maps the snapshot's categories to labelled item lists, dropping empty ones.
pub fn shape_stock(snapshot: &StockSnapshot, options: ShapeOptions) -> ShapedStock {
    let categories = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let items = snapshot.items(category);
            if items.is_empty() {
                return None;
            }

            let shaped = items
                .iter()
                .map(|item| shape_item(item, snapshot, options))
                .collect();
            Some((category, shaped))
        })
        .collect();

    ShapedStock { categories }
}

fn shape_item(item: &StockItem, snapshot: &StockSnapshot, options: ShapeOptions) -> ShapedItem {
    let image = match options.image_source {
        ImageSource::ItemField => item.image.clone(),
        ImageSource::SideTable => snapshot.image_data.get(&item.name).cloned(),
    };

    ShapedItem {
        name: item.name.clone(),
        value: if options.keep_value {
            item.value.clone()
        } else {
            None
        },
        image,
    }
}
