// 内置的早晚记念列表

use crate::models::{Category, ThikrItem};

/// (文本, 次数, 出处)
type SeedEntry = (&'static str, u32, &'static str);

const AYAT_AL_KURSI: &str = "اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ الْحَيُّ الْقَيُّومُ ۚ لَا تَأْخُذُهُ سِنَةٌ وَلَا نَوْمٌ ۚ لَّهُ مَا فِي السَّمَاوَاتِ وَمَا فِي الْأَرْضِ ۗ مَن ذَا الَّذِي يَشْفَعُ عِندَهُ إِلَّا بِإِذْنِهِ ۚ يَعْلَمُ مَا بَيْنَ أَيْدِيهِمْ وَمَا خَلْفَهُمْ ۖ وَلَا يُحِيطُونَ بِشَيْءٍ مِّنْ عِلْمِهِ إِلَّا بِمَا شَاءَ ۚ وَسِعَ كُرْسِيُّهُ السَّمَاوَاتِ وَالْأَرْضَ ۖ وَلَا يَئُودُهُ حِفْظُهُمَا ۚ وَهُوَ الْعَلِيُّ الْعَظِيمُ";

const BISMILLAH_PROTECTION: &str = "بِسْمِ اللَّهِ الَّذِي لَا يَضُرُّ مَعَ اسْمِهِ شَيْءٌ فِي الْأَرْضِ وَلَا فِي السَّمَاءِ وَهُوَ السَّمِيعُ الْعَلِيمُ";

const MORNING: &[SeedEntry] = &[
    (AYAT_AL_KURSI, 1, "سورة البقرة: 255"),
    (
        "أَصْبَحْنَا وَأَصْبَحَ الْمُلْكُ لِلَّهِ، وَالْحَمْدُ لِلَّهِ، لَا إِلَٰهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ",
        1,
        "رواه مسلم",
    ),
    (BISMILLAH_PROTECTION, 3, "رواه أبو داود والترمذي"),
    ("سُبْحَانَ اللَّهِ وَبِحَمْدِهِ", 100, "رواه مسلم"),
    (
        "لَا إِلَٰهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ، لَهُ الْمُلْكُ وَلَهُ الْحَمْدُ وَهُوَ عَلَىٰ كُلِّ شَيْءٍ قَدِيرٌ",
        100,
        "متفق عليه",
    ),
    ("أَسْتَغْفِرُ اللَّهَ وَأَتُوبُ إِلَيْهِ", 100, "متفق عليه"),
];

const EVENING: &[SeedEntry] = &[
    (AYAT_AL_KURSI, 1, "سورة البقرة: 255"),
    (
        "أَمْسَيْنَا وَأَمْسَى الْمُلْكُ لِلَّهِ، وَالْحَمْدُ لِلَّهِ، لَا إِلَٰهَ إِلَّا اللَّهُ وَحْدَهُ لَا شَرِيكَ لَهُ",
        1,
        "رواه مسلم",
    ),
    (
        "أَعُوذُ بِكَلِمَاتِ اللَّهِ التَّامَّاتِ مِنْ شَرِّ مَا خَلَقَ",
        3,
        "رواه مسلم",
    ),
    (BISMILLAH_PROTECTION, 3, "رواه أبو داود والترمذي"),
    ("سُبْحَانَ اللَّهِ وَبِحَمْدِهِ", 100, "رواه مسلم"),
];

/// 构建指定类别的内置列表，ID 形如 `morning-1`
///
/// 扫描列表没有内置内容
pub fn builtin(category: Category) -> Vec<ThikrItem> {
    let entries = match category {
        Category::Morning => MORNING,
        Category::Evening => EVENING,
        Category::Scanned => return Vec::new(),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, (text, count, reference))| {
            ThikrItem::new(
                format!("{}-{}", category, index + 1),
                *text,
                *count,
                *reference,
                category,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_lists_are_well_formed() {
        for category in [Category::Morning, Category::Evening] {
            let items = builtin(category);
            assert!(!items.is_empty());

            let ids: HashSet<_> = items.iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids.len(), items.len(), "{} 的ID必须唯一", category);

            for item in &items {
                assert_eq!(item.category, category);
                assert_eq!(item.current_count, 0);
                assert!(item.count >= 1);
                assert!(!item.text.trim().is_empty());
            }
        }

        assert_eq!(builtin(Category::Morning)[0].id, "morning-1");
        assert!(builtin(Category::Scanned).is_empty());
    }
}
