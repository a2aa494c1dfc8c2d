//! LDraw sources shared by the integration tests.

/// A small house split over three pages.
pub const HOUSE_MPD: &str = "0 FILE house.ldr\r
0 Small house\r
0 Name: house.ldr\r
0 Author: Jane Builder\r
0 !LDRAW_ORG Unofficial_Model\r
1 16 0 0 0 1 0 0 0 1 0 0 0 1 walls.ldr\r
0 STEP\r
0 GROUP 1 roof\r
0 MLCAD BTG roof\r
1 4 0 -72 0 1 0 0 0 1 0 0 0 1 roof.ldr\r
0 NOFILE\r
0 FILE walls.ldr\r
1 15 -40 0 0 1 0 0 0 1 0 0 0 1 3001.dat\r
1 15 40 0 0 1 0 0 0 1 0 0 0 1 3001.dat\r
0 NOFILE\r
0 FILE roof.ldr\r
1 16 0 0 0 1 0 0 0 1 0 0 0 1 3037.dat\r
0 NOFILE\r
";

/// A parts-library page using every header line the serializer writes.
pub const BRICK_PART: &str = "0 Brick  1 x  2\r
0 Name: 3004.dat\r
0 Author: James Jessiman\r
0 !LDRAW_ORG Part UPDATE 2002-03\r
0 !LICENSE Licensed under CC BY 4.0 : see CAreadme.txt\r
0 !HELP Use with the stud logo primitive\r
0 BFC CERTIFY CCW\r
0 !CATEGORY Brick\r
0 !KEYWORDS classic, basic\r
0 !CMDLINE -c4\r
0 !HISTORY 2002-03-23 [sbliss] BFC certification\r
0 BFC INVERTNEXT\r
1 16 0 24 0 16 0 0 0 -20 0 0 0 6 box5.dat\r
4 16 20 24 10 -20 24 10 -20 24 -10 20 24 -10\r
2 24 20 24 10 -20 24 10\r
";

/// Library pages used by the resolver tests.
pub const LIBRARY_MPD: &str = "0 FILE 3001.dat\r
0 Brick  2 x  4\r
4 16 0 0 0 1 0 0 1 0 1 0 0 1\r
0 NOFILE\r
0 FILE 3002old.dat\r
0 ~Moved to 3002\r
1 16 10 0 0 1 0 0 0 1 0 0 0 1 3002.dat\r
0 NOFILE\r
0 FILE 3002.dat\r
0 Brick  2 x  3\r
4 16 0 0 0 1 0 0 1 0 1 0 0 1\r
0 NOFILE\r
0 FILE 3003a.dat\r
0 Brick  2 x  2 Alias\r
0 !LDRAW_ORG Part Alias\r
1 16 0 -8 0 1 0 0 0 1 0 0 0 1 3003.dat\r
0 NOFILE\r
0 FILE 3003.dat\r
0 Brick  2 x  2\r
4 16 0 0 0 1 0 0 1 0 1 0 0 1\r
0 NOFILE\r
";
